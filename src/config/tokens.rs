//! Closed token sets for enumerated fields.
//!
//! Subscription types, subscription statuses and API key scopes are owned
//! by the surrounding service. They are handed to the validator once, when
//! the schemas are built, and checked here so a malformed vocabulary stops
//! startup instead of surfacing per request.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::validation::error::SchemaError;

/// Discriminant token selecting the log filter schema.
pub const LOG_TYPE: &str = "log";
/// Discriminant token selecting the transaction filter schema.
pub const TRANSACTION_TYPE: &str = "transaction";

/// The enumerated vocabularies used by the named schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSets {
    pub subscription_types: Vec<String>,
    pub subscription_statuses: Vec<String>,
    pub scopes: Vec<String>,
}

impl Default for TokenSets {
    fn default() -> Self {
        let owned = |tokens: &[&str]| -> Vec<String> { tokens.iter().map(|t| t.to_string()).collect() };
        Self {
            subscription_types: owned(&[LOG_TYPE, TRANSACTION_TYPE]),
            subscription_statuses: owned(&["active", "deactivated"]),
            scopes: owned(&[
                "read:subscription",
                "create:subscription",
                "deactivate:subscription",
                "read:api_key",
                "create:api_key",
                "delete:api_key",
            ]),
        }
    }
}

impl TokenSets {
    /// Parse token sets from a JSON document such as
    /// `{"subscriptionTypes": [...], "subscriptionStatuses": [...], "scopes": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let sets: TokenSets = serde_json::from_str(json)?;
        sets.check()?;
        Ok(sets)
    }

    /// Construction-time gate for the vocabulary.
    pub fn check(&self) -> Result<(), SchemaError> {
        check_set("subscriptionTypes", &self.subscription_types)?;
        check_set("subscriptionStatuses", &self.subscription_statuses)?;
        check_set("scopes", &self.scopes)?;

        for required in [LOG_TYPE, TRANSACTION_TYPE] {
            if !self.subscription_types.iter().any(|t| t == required) {
                return Err(SchemaError::MissingDiscriminant(required.to_string()));
            }
        }
        Ok(())
    }
}

fn check_set(name: &'static str, tokens: &[String]) -> Result<(), SchemaError> {
    if tokens.is_empty() {
        return Err(SchemaError::EmptyTokenSet(name));
    }

    let mut seen = HashSet::new();
    for token in tokens {
        if token.is_empty() {
            return Err(SchemaError::EmptyToken(name));
        }
        if !seen.insert(token.as_str()) {
            return Err(SchemaError::DuplicateToken {
                set: name,
                token: token.clone(),
            });
        }
    }
    Ok(())
}
