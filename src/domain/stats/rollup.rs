use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::common::model::TimeRange;

/// Widest span still drawn hour by hour.
pub const HOUR_ROLLUP_MAX_SPAN_DAYS: i64 = 3;

/// Default span when a request names neither bound.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Display granularity, ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollupGranularity {
    Hour,
    Day,
}

impl RollupGranularity {
    pub fn as_code(&self) -> &'static str {
        match self {
            RollupGranularity::Hour => "hour",
            RollupGranularity::Day => "day",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "hour" => Some(RollupGranularity::Hour),
            "day" => Some(RollupGranularity::Day),
            _ => None,
        }
    }

    /// Sub-day granularities label ticks with time of day.
    pub fn is_sub_day(&self) -> bool {
        matches!(self, RollupGranularity::Hour)
    }
}

/// Pick the granularity for a requested range. Edges may come in either
/// order; a zero-width range gets the finest band.
pub fn choose_rollup(start: DateTime<Utc>, end: DateTime<Utc>) -> RollupGranularity {
    let span = (end - start).abs();
    if span <= Duration::days(HOUR_ROLLUP_MAX_SPAN_DAYS) {
        RollupGranularity::Hour
    } else {
        RollupGranularity::Day
    }
}

/// Requested range plus the granularity it is displayed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub rollup: RollupGranularity,
}

impl TimeWindow {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}

/// Build a window from optional bounds.
///
/// Missing `end` means `now`, missing `start` means `DEFAULT_WINDOW_DAYS`
/// before `end`. An explicit rollup is honored unless it is too fine for the
/// span, in which case the automatic choice wins.
pub fn resolve_time_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    rollup: Option<RollupGranularity>,
    now: DateTime<Utc>,
) -> TimeWindow {
    let end = end.unwrap_or(now);
    let start = start.unwrap_or_else(|| end - Duration::days(DEFAULT_WINDOW_DAYS));
    let range = TimeRange::new(start, end);

    let rollup = match rollup {
        Some(r) => {
            // Soft validation: log but never fail
            if let Err(err) = validate_rollup(range.start(), range.end(), r) {
                warn!("Invalid rollup override {:?}: {}", r, err);
                choose_rollup(range.start(), range.end())
            } else {
                r
            }
        }
        None => choose_rollup(range.start(), range.end()),
    };

    TimeWindow {
        start: range.start(),
        end: range.end(),
        rollup,
    }
}

pub fn validate_rollup(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    rollup: RollupGranularity,
) -> Result<(), String> {
    match rollup {
        RollupGranularity::Hour => {
            if (end - start).abs() > Duration::days(HOUR_ROLLUP_MAX_SPAN_DAYS) {
                return Err(format!(
                    "hour rollup cannot be used for ranges > {} days",
                    HOUR_ROLLUP_MAX_SPAN_DAYS
                ));
            }
        }
        RollupGranularity::Day => { /* always allowed */ }
    }
    Ok(())
}
