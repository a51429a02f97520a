use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::common::service::StatusStatsSource;

use super::ticket_status_api_repository_trait::TicketStatusApiRepository;
use super::ticket_status_entity::TicketStatusEntity;
use super::ticket_status_fs_adapter::{TicketStatusFsAdapter, TicketStatusFsAdapterTrait};

pub struct TicketStatusRepository {
    adapter: TicketStatusFsAdapter,
}

impl TicketStatusRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            adapter: TicketStatusFsAdapter::new(data_dir),
        }
    }
}

impl TicketStatusApiRepository for TicketStatusRepository {
    fn fs_adapter(&self) -> &dyn TicketStatusFsAdapterTrait {
        &self.adapter
    }
}

#[async_trait]
impl StatusStatsSource for TicketStatusRepository {
    async fn fetch_ticket_status(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TicketStatusEntity>> {
        self.get_row_between(from, to)
    }
}
