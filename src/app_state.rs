use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::persistence::ticket_status::ticket_status_repository::TicketStatusRepository;
use crate::domain::stats::service::ticket_stats_service::TicketStatsService;

#[derive(Clone)]
pub struct AppState {
    pub stats_service: Arc<TicketStatsService<TicketStatusRepository>>,
}

pub fn build_app_state(config: &AppConfig) -> AppState {
    AppState {
        stats_service: Arc::new(TicketStatsService::new(
            TicketStatusRepository::new(&config.data_dir),
            config.formatter,
        )),
    }
}
