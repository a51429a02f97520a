//! Shared domain types (time ranges, series points)

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Anything that sits at a single instant on a time axis.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Closed interval `[start, end]`; `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Edges may come in either order.
    pub fn new(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }
}

/// One instant of a multi-series chart: series name -> value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub time: DateTime<Utc>,
    pub values: BTreeMap<String, f64>,
}

impl TimeSeriesPoint {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            time,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, series: &str, value: f64) -> Self {
        self.values.insert(series.to_string(), value);
        self
    }

    pub fn value(&self, series: &str) -> Option<f64> {
        self.values.get(series).copied()
    }
}

impl Timestamped for TimeSeriesPoint {
    fn timestamp(&self) -> DateTime<Utc> {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn time_range_orders_its_edges() {
        let a = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let range = TimeRange::new(a, b);
        assert_eq!(range.start(), b);
        assert_eq!(range.end(), a);
        assert_eq!(range.span(), Duration::days(1));
        assert!(range.contains(a) && range.contains(b));
        assert!(!range.contains(a + Duration::seconds(1)));
    }
}
