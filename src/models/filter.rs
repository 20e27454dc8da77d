//! Filter definitions for log and transaction subscriptions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 20-byte address, lowercase `0x` hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

/// 32-byte log topic, lowercase `0x` hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(pub String);

/// 4-byte method selector, lowercase `0x` hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodSignature(pub String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Topic {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl MethodSignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// No constraint, one accepted value, or a list of accepted values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue<T> {
    Any,
    One(T),
    Many(Vec<T>),
}

impl<T> Default for FilterValue<T> {
    fn default() -> Self {
        FilterValue::Any
    }
}

impl<T> FilterValue<T> {
    pub fn is_any(&self) -> bool {
        matches!(self, FilterValue::Any)
    }

    /// Accepted values; empty when unconstrained.
    pub fn values(&self) -> &[T] {
        match self {
            FilterValue::Any => &[],
            FilterValue::One(v) => std::slice::from_ref(v),
            FilterValue::Many(vs) => vs,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogFilter {
    #[serde(default, skip_serializing_if = "FilterValue::is_any")]
    pub address: FilterValue<Address>,
    #[serde(default, skip_serializing_if = "FilterValue::is_any")]
    pub topic0: FilterValue<Topic>,
    #[serde(default, skip_serializing_if = "FilterValue::is_any")]
    pub topic1: FilterValue<Topic>,
    #[serde(default, skip_serializing_if = "FilterValue::is_any")]
    pub topic2: FilterValue<Topic>,
    #[serde(default, skip_serializing_if = "FilterValue::is_any")]
    pub topic3: FilterValue<Topic>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransactionFilter {
    #[serde(default, skip_serializing_if = "FilterValue::is_any")]
    pub from: FilterValue<Address>,
    #[serde(default, skip_serializing_if = "FilterValue::is_any")]
    pub to: FilterValue<Address>,
    #[serde(default, skip_serializing_if = "FilterValue::is_any")]
    pub method_signature: FilterValue<MethodSignature>,
}

/// What a subscription matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionKind {
    Log,
    Transaction,
}

impl SubscriptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionKind::Log => "log",
            SubscriptionKind::Transaction => "transaction",
        }
    }
}

/// Filters of either kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SubscriptionFilters {
    Log(LogFilter),
    Transaction(TransactionFilter),
}

impl SubscriptionFilters {
    pub fn kind(&self) -> SubscriptionKind {
        match self {
            SubscriptionFilters::Log(_) => SubscriptionKind::Log,
            SubscriptionFilters::Transaction(_) => SubscriptionKind::Transaction,
        }
    }

    pub fn from_value(kind: SubscriptionKind, value: Value) -> Result<Self, serde_json::Error> {
        match kind {
            SubscriptionKind::Log => serde_json::from_value(value).map(SubscriptionFilters::Log),
            SubscriptionKind::Transaction => {
                serde_json::from_value(value).map(SubscriptionFilters::Transaction)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_value_shapes() {
        let filter: LogFilter = serde_json::from_value(json!({
            "address": null,
            "topic0": "0x01",
            "topic1": ["0x02", "0x03"]
        }))
        .unwrap();

        assert!(filter.address.is_any());
        assert_eq!(filter.topic0, FilterValue::One(Topic("0x01".to_string())));
        assert_eq!(filter.topic1.values().len(), 2);
        assert!(filter.topic3.values().is_empty());
    }

    #[test]
    fn test_unconstrained_fields_are_omitted() {
        let filter = TransactionFilter {
            method_signature: FilterValue::One(MethodSignature("0xa9059cbb".to_string())),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"methodSignature": "0xa9059cbb"})
        );
    }

    #[test]
    fn test_filters_follow_kind() {
        let empty = SubscriptionFilters::from_value(SubscriptionKind::Transaction, json!({})).unwrap();
        assert_eq!(empty.kind(), SubscriptionKind::Transaction);

        assert!(SubscriptionFilters::from_value(SubscriptionKind::Log, json!({"from": null})).is_err());
    }
}
