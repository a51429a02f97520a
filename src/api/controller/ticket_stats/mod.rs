//! Ticket statistics controller: connects routes to the stats service

use axum::extract::{Query, State};
use axum::Json;

use crate::api::dto::ticket_stats_dto::{TicketStatusChartQuery, TicketStatusQuery};
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::ticket_status::ticket_status_entity::TicketStatusEntity;
use crate::domain::stats::chart::ChartSpec;
use crate::errors::AppError;

pub struct TicketStatsController;

impl TicketStatsController {
    pub async fn get_ticket_status(
        State(state): State<AppState>,
        Query(q): Query<TicketStatusQuery>,
    ) -> Result<Json<ApiResponse<Vec<TicketStatusEntity>>>, AppError> {
        to_json(state.stats_service.get_ticket_status(q).await)
    }

    pub async fn get_ticket_status_chart(
        State(state): State<AppState>,
        Query(q): Query<TicketStatusChartQuery>,
    ) -> Result<Json<ApiResponse<ChartSpec>>, AppError> {
        to_json(state.stats_service.get_ticket_status_chart(q).await)
    }
}
