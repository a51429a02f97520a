//! Ticket statistics query DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::stats::rollup::RollupGranularity;
use crate::domain::stats::selection::SelectionEvent;

#[derive(Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_status_query"))]
pub struct TicketStatusQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_chart_query"))]
pub struct TicketStatusChartQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,

    /// Brushed sub-range; both edges or neither.
    pub selected_from: Option<DateTime<Utc>>,
    pub selected_to: Option<DateTime<Utc>>,

    /// Explicit granularity; ignored when too fine for the range.
    pub rollup: Option<RollupGranularity>,
}

impl TicketStatusChartQuery {
    pub fn selection_event(&self) -> SelectionEvent {
        match (self.selected_from, self.selected_to) {
            (Some(a), Some(b)) => SelectionEvent::RangeSelected(a.into(), b.into()),
            _ => SelectionEvent::RangeCleared,
        }
    }
}

fn ordered(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<(), ValidationError> {
    if from > to {
        return Err(ValidationError::new("from_after_to"));
    }
    Ok(())
}

fn validate_status_query(q: &TicketStatusQuery) -> Result<(), ValidationError> {
    ordered(q.from, q.to)
}

fn validate_chart_query(q: &TicketStatusChartQuery) -> Result<(), ValidationError> {
    ordered(q.from, q.to)?;
    if q.selected_from.is_some() != q.selected_to.is_some() {
        return Err(ValidationError::new("partial_selection"));
    }
    Ok(())
}
