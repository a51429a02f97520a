//! Shared domain seams (data sources behind the stats views)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::persistence::ticket_status::ticket_status_entity::TicketStatusEntity;

/// Where ticket-status snapshots come from: the local store on the server,
/// the stats HTTP API on the client. No ordering is promised.
#[async_trait]
pub trait StatusStatsSource: Send + Sync {
    async fn fetch_ticket_status(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TicketStatusEntity>>;
}
