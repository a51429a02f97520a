use anyhow::Result;
use chrono::{DateTime, Duration, DurationRound, Utc};
use tracing::info;

use crate::app_state::AppState;
use crate::core::persistence::ticket_status::ticket_status_api_repository_trait::TicketStatusApiRepository;
use crate::core::persistence::ticket_status::ticket_status_entity::TicketStatusEntity;

const SAMPLE_HOURS: i64 = 24 * 10;

/// Runs only when TICKET_STATS_DEBUG_MODE is set: fills the store with
/// hourly sample snapshots for the last ten days unless some already exist.
pub async fn run_debug(state: &AppState, now: DateTime<Utc>) -> Result<usize> {
    info!("🔧 Debug mode: seeding sample ticket status rows...");

    let repo = state.stats_service.repo();
    let end = now.duration_trunc(Duration::hours(1))?;
    let start = end - Duration::hours(SAMPLE_HOURS - 1);

    if !repo.get_row_between(start, end)?.is_empty() {
        info!("Sample rows already present, skipping");
        return Ok(0);
    }

    for row in sample_rows(start, SAMPLE_HOURS) {
        repo.append(&row)?;
    }

    info!("Seeded {} sample rows", SAMPLE_HOURS);
    Ok(SAMPLE_HOURS as usize)
}

fn sample_rows(start: DateTime<Utc>, hours: i64) -> impl Iterator<Item = TicketStatusEntity> {
    (0..hours).map(move |h| {
        let n = h as u64;
        TicketStatusEntity {
            not_processed: 5 + n % 7,
            waiting_customer_service: 3 + n % 5,
            waiting_customer: 2 + n % 3,
            pre_fulfilled: n % 4,
            fulfilled: 10 + n / 6,
            closed: 20 + n / 3,
            ..TicketStatusEntity::empty(start + Duration::hours(h))
        }
    })
}
