use anyhow::Result;
use chrono::Utc;
use tracing::debug;
use validator::Validate;

use crate::api::dto::ticket_stats_dto::{TicketStatusChartQuery, TicketStatusQuery};
use crate::core::persistence::ticket_status::ticket_status_api_repository_trait::TicketStatusApiRepository;
use crate::core::persistence::ticket_status::ticket_status_entity::TicketStatusEntity;
use crate::domain::stats::chart::{build_status_chart, ChartSpec};
use crate::domain::stats::label::LabelFormatter;
use crate::domain::stats::rollup::resolve_time_window;
use crate::domain::stats::selection::on_range_selected;

pub struct TicketStatsService<R: TicketStatusApiRepository> {
    repo: R,
    formatter: LabelFormatter,
}

impl<R: TicketStatusApiRepository> TicketStatsService<R> {
    pub fn new(repo: R, formatter: LabelFormatter) -> Self {
        Self { repo, formatter }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub async fn get_ticket_status(&self, q: TicketStatusQuery) -> Result<Vec<TicketStatusEntity>> {
        q.validate()?;
        let rows = self.repo.get_row_between(q.from, q.to)?;
        debug!(from = %q.from, to = %q.to, rows = rows.len(), "ticket status query");
        Ok(rows)
    }

    pub async fn get_ticket_status_chart(&self, q: TicketStatusChartQuery) -> Result<ChartSpec> {
        q.validate()?;
        let window = resolve_time_window(Some(q.from), Some(q.to), q.rollup, Utc::now());
        let selection = on_range_selected(&q.selection_event())?;

        let points: Vec<_> = self
            .repo
            .get_row_between(window.start, window.end)?
            .iter()
            .map(|r| r.to_point())
            .collect();

        Ok(build_status_chart(&points, window.rollup, &selection, &self.formatter))
    }
}
