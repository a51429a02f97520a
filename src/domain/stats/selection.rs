use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::common::model::TimeRange;

/// A value on the chart's time axis as the chart reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    /// Milliseconds since the Unix epoch.
    Millis(f64),
    /// RFC 3339 timestamp, as rendered on the axis.
    Text(String),
}

impl AxisValue {
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, SelectionError> {
        match self {
            AxisValue::Millis(ms) => {
                if !ms.is_finite() {
                    return Err(SelectionError::NonFinite(*ms));
                }
                let ms_rounded = ms.round();
                if ms_rounded < i64::MIN as f64 || ms_rounded > i64::MAX as f64 {
                    return Err(SelectionError::OutOfRange(ms.to_string()));
                }
                DateTime::from_timestamp_millis(ms_rounded as i64)
                    .ok_or_else(|| SelectionError::OutOfRange(ms.to_string()))
            }
            AxisValue::Text(text) => DateTime::parse_from_rfc3339(text.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| SelectionError::Unparseable(text.clone())),
        }
    }
}

impl From<DateTime<Utc>> for AxisValue {
    fn from(dt: DateTime<Utc>) -> Self {
        AxisValue::Text(dt.to_rfc3339())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("axis value is not finite: {0}")]
    NonFinite(f64),

    #[error("axis value is outside the representable time range: {0}")]
    OutOfRange(String),

    #[error("axis value is not an RFC 3339 timestamp: {0}")]
    Unparseable(String),
}

/// What the chart reported after a brush gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum SelectionEvent {
    /// Two edges, in whatever order the gesture produced them.
    RangeSelected(AxisValue, AxisValue),
    RangeCleared,
}

impl SelectionEvent {
    /// Build from the raw list of selected axis values: the first and last
    /// entries are the edges; a missing or empty list clears.
    pub fn from_axis_values(values: Option<Vec<AxisValue>>) -> Self {
        let values = values.unwrap_or_default();
        match (values.first(), values.last()) {
            (Some(first), Some(last)) => SelectionEvent::RangeSelected(first.clone(), last.clone()),
            _ => SelectionEvent::RangeCleared,
        }
    }
}

/// Current display filter of a chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "range", rename_all = "snake_case")]
pub enum RangeSelection {
    /// Show the full series.
    #[default]
    Unselected,
    Range(TimeRange),
}

impl RangeSelection {
    pub fn range(&self) -> Option<TimeRange> {
        match self {
            RangeSelection::Unselected => None,
            RangeSelection::Range(r) => Some(*r),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, RangeSelection::Range(_))
    }
}

/// Normalize a chart selection event.
///
/// Reversed edges are swapped. Equal edges collapse to
/// [`RangeSelection::Unselected`]: a zero-width drag cancels the filter, so a
/// genuine single-instant selection cannot be expressed.
pub fn on_range_selected(event: &SelectionEvent) -> Result<RangeSelection, SelectionError> {
    match event {
        SelectionEvent::RangeCleared => Ok(RangeSelection::Unselected),
        SelectionEvent::RangeSelected(a, b) => {
            let a = a.to_datetime()?;
            let b = b.to_datetime()?;
            if a == b {
                return Ok(RangeSelection::Unselected);
            }
            Ok(RangeSelection::Range(TimeRange::new(a, b)))
        }
    }
}
