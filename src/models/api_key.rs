//! API key models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: String,
    pub scopes: Vec<String>,
}

/// Issued API key. `id`, `user` and `secret` are opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    #[serde(flatten)]
    pub request: CreateApiKeyRequest,
    pub id: String,
    pub user: String,
    pub secret: String,
}

impl ApiKey {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.request.scopes.iter().any(|s| s == scope)
    }
}
