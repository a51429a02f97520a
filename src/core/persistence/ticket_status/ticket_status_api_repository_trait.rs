use anyhow::Result;
use chrono::{DateTime, Utc};

use super::ticket_status_entity::TicketStatusEntity;
use super::ticket_status_fs_adapter::TicketStatusFsAdapterTrait;

/// API-facing repository abstraction for ticket-status snapshots.
pub trait TicketStatusApiRepository: Send + Sync {
    fn fs_adapter(&self) -> &dyn TicketStatusFsAdapterTrait;

    /// Rows in `[start, end]`, ordered by time.
    fn get_row_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<TicketStatusEntity>> {
        let mut rows = self.fs_adapter().get_row_between(start, end)?;
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }

    fn append(&self, row: &TicketStatusEntity) -> Result<()> {
        self.fs_adapter().append_row(row)
    }
}
