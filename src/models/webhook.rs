//! Webhook delivery receipt models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookReceiptResult {
    pub success: bool,
    pub status_code: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookReceipt {
    pub id: String,
    pub subscription_id: String,
    pub url: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: f64,
    pub result: WebhookReceiptResult,
}

impl WebhookReceipt {
    /// Delivery time, if the timestamp is a representable instant.
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        if !self.timestamp.is_finite() {
            return None;
        }
        DateTime::<Utc>::from_timestamp_millis(self.timestamp as i64)
    }
}
