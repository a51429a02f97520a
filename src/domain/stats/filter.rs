use tracing::debug;

use crate::domain::common::model::Timestamped;
use crate::domain::stats::selection::{
    on_range_selected, RangeSelection, SelectionError, SelectionEvent,
};

/// Sorted copy of `series`, restricted to `selection` when one is set.
///
/// The sort is stable, so records sharing a timestamp keep their input
/// order. The range is inclusive at both ends. The input is left untouched.
pub fn apply_filter<T>(series: &[T], selection: &RangeSelection) -> Vec<T>
where
    T: Timestamped + Clone,
{
    let mut rows: Vec<T> = match selection.range() {
        None => series.to_vec(),
        Some(range) => series
            .iter()
            .filter(|row| range.contains(row.timestamp()))
            .cloned()
            .collect(),
    };
    rows.sort_by_key(|row| row.timestamp());
    rows
}

/// Display filter of one chart: `Unselected` until the user brushes a
/// range, back to `Unselected` when the brush is cleared or collapses.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesFilter {
    selection: RangeSelection,
}

impl TimeSeriesFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> RangeSelection {
        self.selection
    }

    pub fn is_filtered(&self) -> bool {
        self.selection.is_selected()
    }

    /// Feed one chart event. An invalid event leaves the state unchanged.
    pub fn handle(&mut self, event: &SelectionEvent) -> Result<RangeSelection, SelectionError> {
        let next = on_range_selected(event)?;
        if next != self.selection {
            debug!(from = ?self.selection, to = ?next, "selection changed");
        }
        self.selection = next;
        Ok(next)
    }

    pub fn clear(&mut self) {
        if self.selection.is_selected() {
            debug!("selection cleared");
        }
        self.selection = RangeSelection::Unselected;
    }

    pub fn apply<T: Timestamped + Clone>(&self, series: &[T]) -> Vec<T> {
        apply_filter(series, &self.selection)
    }
}
