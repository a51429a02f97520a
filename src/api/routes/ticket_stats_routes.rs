//! Ticket statistics routes (e.g., /api/v1/ticket-stats/*)

use axum::{routing::get, Router};

use crate::api::controller::ticket_stats::TicketStatsController;
use crate::app_state::AppState;

pub fn ticket_stats_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(TicketStatsController::get_ticket_status))
        .route("/status/chart", get(TicketStatsController::get_ticket_status_chart))
}
