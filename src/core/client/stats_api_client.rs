use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::core::persistence::ticket_status::ticket_status_entity::TicketStatusEntity;
use crate::domain::common::service::StatusStatsSource;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    is_successful: bool,
    data: Option<T>,
    error_msg: Option<String>,
}

/// HTTP client for the ticket statistics API.
#[derive(Clone)]
pub struct StatsApiClient {
    base_url: String,
    http: Client,
}

impl StatsApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Client for `TICKET_STATS_API_URL`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.api_url)
    }

    pub fn with_client(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn status_url(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> String {
        format!(
            "{}/api/v1/ticket-stats/status?from={}&to={}",
            self.base_url,
            urlencoding::encode(&from.to_rfc3339_opts(SecondsFormat::Millis, true)),
            urlencoding::encode(&to.to_rfc3339_opts(SecondsFormat::Millis, true)),
        )
    }
}

#[async_trait]
impl StatusStatsSource for StatsApiClient {
    async fn fetch_ticket_status(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TicketStatusEntity>> {
        let url = self.status_url(from, to);
        debug!(%url, "fetching ticket status");

        let envelope: Envelope<Vec<TicketStatusEntity>> = self
            .http
            .get(&url)
            .send()
            .await
            .context("ticket status request failed")?
            .error_for_status()?
            .json()
            .await
            .context("ticket status response is not valid JSON")?;

        if !envelope.is_successful {
            return Err(anyhow!(
                "ticket status request rejected: {}",
                envelope.error_msg.unwrap_or_default()
            ));
        }
        Ok(envelope.data.unwrap_or_default())
    }
}
