//! Subscription request and record models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::BranchDefault;

use super::filter::SubscriptionFilters;

/// Accepted subscription creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCreateSubscriptionRequest")]
pub struct CreateSubscriptionRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub subscription_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub webhook_url: String,
    pub filters: SubscriptionFilters,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCreateSubscriptionRequest {
    name: String,
    #[serde(rename = "type")]
    subscription_type: String,
    #[serde(default)]
    description: Option<String>,
    webhook_url: String,
    filters: Value,
}

impl TryFrom<RawCreateSubscriptionRequest> for CreateSubscriptionRequest {
    type Error = serde_json::Error;

    fn try_from(raw: RawCreateSubscriptionRequest) -> Result<Self, Self::Error> {
        let kind = BranchDefault::Transaction.select(Some(&raw.subscription_type));
        Ok(Self {
            filters: SubscriptionFilters::from_value(kind, raw.filters)?,
            name: raw.name,
            subscription_type: raw.subscription_type,
            description: raw.description,
            webhook_url: raw.webhook_url,
        })
    }
}

/// Stored subscription: the creation request plus server-assigned fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(flatten)]
    pub request: CreateSubscriptionRequest,
    pub id: String,
    pub timestamp: f64,
    pub user: String,
    pub secret: String,
    pub status: String,
    pub subscription_arn: String,
}

/// Request for example filter output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGetExampleRequest")]
pub struct GetExampleRequest {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub subscription_type: Option<String>,
    pub filters: SubscriptionFilters,
}

#[derive(Deserialize)]
struct RawGetExampleRequest {
    #[serde(rename = "type", default)]
    subscription_type: Option<String>,
    filters: Value,
}

impl TryFrom<RawGetExampleRequest> for GetExampleRequest {
    type Error = serde_json::Error;

    fn try_from(raw: RawGetExampleRequest) -> Result<Self, Self::Error> {
        let kind = BranchDefault::Log.select(raw.subscription_type.as_deref());
        Ok(Self {
            filters: SubscriptionFilters::from_value(kind, raw.filters)?,
            subscription_type: raw.subscription_type,
        })
    }
}
