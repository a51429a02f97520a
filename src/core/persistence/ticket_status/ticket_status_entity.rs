use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::model::{TimeSeriesPoint, Timestamped};

/// Ticket counts per status at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatusEntity {
    pub date: DateTime<Utc>,
    pub not_processed: u64,
    pub waiting_customer_service: u64,
    pub waiting_customer: u64,
    pub pre_fulfilled: u64,
    pub fulfilled: u64,
    pub closed: u64,
}

impl TicketStatusEntity {
    pub fn empty(date: DateTime<Utc>) -> Self {
        Self {
            date,
            not_processed: 0,
            waiting_customer_service: 0,
            waiting_customer: 0,
            pre_fulfilled: 0,
            fulfilled: 0,
            closed: 0,
        }
    }

    /// `(series key, count)` pairs in chart order.
    pub fn counts(&self) -> [(&'static str, u64); 6] {
        [
            ("notProcessed", self.not_processed),
            ("waitingCustomerService", self.waiting_customer_service),
            ("waitingCustomer", self.waiting_customer),
            ("preFulfilled", self.pre_fulfilled),
            ("fulfilled", self.fulfilled),
            ("closed", self.closed),
        ]
    }

    pub fn to_point(&self) -> TimeSeriesPoint {
        self.counts()
            .into_iter()
            .fold(TimeSeriesPoint::new(self.date), |point, (key, count)| {
                point.with(key, count as f64)
            })
    }
}

impl Timestamped for TicketStatusEntity {
    fn timestamp(&self) -> DateTime<Utc> {
        self.date
    }
}
