//! Named request schemas.
//!
//! All schemas are assembled once from a [`TokenSets`] vocabulary and are
//! read-only afterwards, so one [`SchemaSet`] can serve any number of
//! concurrent callers.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::tokens::TokenSets;
use crate::logging::structured::LogContext;
use crate::models::{
    ApiKey, CreateApiKeyRequest, CreateSubscriptionRequest, GetExampleRequest, LogFilter,
    Subscription, TransactionFilter, WebhookReceipt,
};

use super::error::{ErrorKind, FieldError, FieldPath, SchemaError, ValidationErrors};
use super::filter::filter_option;
use super::formats::{HexSecret, HexToken, Uri, UuidV4};
use super::object::{BranchDefault, FilterBranch, ObjectSchema};
use super::rules::{Boolean, ListOf, Number, OneOf, Rule, Text};

/// Names of the published contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaName {
    WebhookReceiptResult,
    WebhookReceipt,
    SubscriptionLogFilter,
    SubscriptionTransactionFilter,
    CreateSubscriptionRequest,
    Subscription,
    Scope,
    CreateApiKeyRequest,
    ApiKey,
    GetExampleRequest,
}

impl SchemaName {
    pub const ALL: [SchemaName; 10] = [
        SchemaName::WebhookReceiptResult,
        SchemaName::WebhookReceipt,
        SchemaName::SubscriptionLogFilter,
        SchemaName::SubscriptionTransactionFilter,
        SchemaName::CreateSubscriptionRequest,
        SchemaName::Subscription,
        SchemaName::Scope,
        SchemaName::CreateApiKeyRequest,
        SchemaName::ApiKey,
        SchemaName::GetExampleRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaName::WebhookReceiptResult => "WebhookReceiptResult",
            SchemaName::WebhookReceipt => "WebhookReceipt",
            SchemaName::SubscriptionLogFilter => "SubscriptionLogFilter",
            SchemaName::SubscriptionTransactionFilter => "SubscriptionTransactionFilter",
            SchemaName::CreateSubscriptionRequest => "CreateSubscriptionRequest",
            SchemaName::Subscription => "Subscription",
            SchemaName::Scope => "Scope",
            SchemaName::CreateApiKeyRequest => "CreateApiKeyRequest",
            SchemaName::ApiKey => "ApiKey",
            SchemaName::GetExampleRequest => "GetExampleRequest",
        }
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaName {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownSchema(s.to_string()))
    }
}

/// Every named schema, built from one vocabulary.
pub struct SchemaSet {
    tokens: TokenSets,
    schemas: HashMap<SchemaName, Arc<dyn Rule>>,
}

impl fmt::Debug for SchemaSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaSet")
            .field("tokens", &self.tokens)
            .field("schemas", &self.schemas.len())
            .finish()
    }
}

impl SchemaSet {
    /// Build all schemas. Fails if the vocabulary is unusable.
    pub fn new(tokens: TokenSets) -> Result<Self, SchemaError> {
        tokens.check()?;

        let subscription_type = OneOf::new("subscriptionTypes", &tokens.subscription_types);
        let subscription_status = OneOf::new("subscriptionStatuses", &tokens.subscription_statuses);
        let scope = OneOf::new("scopes", &tokens.scopes);

        let log_filter = ObjectSchema::new()
            .optional("address", filter_option(HexToken::address()))
            .optional("topic0", filter_option(HexToken::topic()))
            .optional("topic1", filter_option(HexToken::topic()))
            .optional("topic2", filter_option(HexToken::topic()))
            .optional("topic3", filter_option(HexToken::topic()));

        let transaction_filter = ObjectSchema::new()
            .optional("from", filter_option(HexToken::address()))
            .optional("to", filter_option(HexToken::address()))
            .optional("methodSignature", filter_option(HexToken::method_signature()));

        let receipt_result = ObjectSchema::new()
            .required("success", Boolean)
            .required("statusCode", Number);

        let receipt = ObjectSchema::new()
            .required("id", UuidV4)
            .required("subscriptionId", UuidV4)
            .required("url", Uri::http())
            .required("timestamp", Number)
            .required("result", receipt_result.clone());

        let create_subscription = ObjectSchema::new()
            .required("name", Text::bounded(1, 256))
            .required("type", subscription_type.clone())
            .optional("description", Text::bounded(1, 1024))
            .required("webhookUrl", Uri::webhook())
            .branch(FilterBranch::new(
                "type",
                "filters",
                BranchDefault::Transaction,
                log_filter.clone(),
                transaction_filter.clone(),
            ));

        let subscription = create_subscription
            .clone()
            .required("id", UuidV4)
            .required("timestamp", Number)
            .required("user", Text::any())
            .required("secret", HexSecret::bytes(32))
            .required("status", subscription_status)
            .required("subscriptionArn", Text::any());

        let create_api_key = ObjectSchema::new()
            .required("name", Text::bounded(1, 256))
            .required("scopes", ListOf::new(scope.clone()).min(1).unique());

        let api_key = create_api_key
            .clone()
            .required("id", Text::any())
            .required("user", Text::any())
            .required("secret", Text::any());

        let example = ObjectSchema::new()
            .optional("type", subscription_type)
            .branch(FilterBranch::new(
                "type",
                "filters",
                BranchDefault::Log,
                log_filter.clone(),
                transaction_filter.clone(),
            ));

        let mut schemas: HashMap<SchemaName, Arc<dyn Rule>> = HashMap::new();
        schemas.insert(SchemaName::WebhookReceiptResult, Arc::new(receipt_result));
        schemas.insert(SchemaName::WebhookReceipt, Arc::new(receipt));
        schemas.insert(SchemaName::SubscriptionLogFilter, Arc::new(log_filter));
        schemas.insert(SchemaName::SubscriptionTransactionFilter, Arc::new(transaction_filter));
        schemas.insert(SchemaName::CreateSubscriptionRequest, Arc::new(create_subscription));
        schemas.insert(SchemaName::Subscription, Arc::new(subscription));
        schemas.insert(SchemaName::Scope, Arc::new(scope));
        schemas.insert(SchemaName::CreateApiKeyRequest, Arc::new(create_api_key));
        schemas.insert(SchemaName::ApiKey, Arc::new(api_key));
        schemas.insert(SchemaName::GetExampleRequest, Arc::new(example));

        crate::log_info!(
            LogContext::detached(),
            "SCHEMA_SET_BUILT",
            schemas = schemas.len(),
            subscription_types = tokens.subscription_types,
            statuses = tokens.subscription_statuses,
            scopes = tokens.scopes,
        );

        Ok(Self { tokens, schemas })
    }

    pub fn tokens(&self) -> &TokenSets {
        &self.tokens
    }

    /// Validate `value` against `name`, returning the normalized value.
    pub fn validate(&self, name: SchemaName, value: &Value) -> Result<Value, ValidationErrors> {
        self.validate_with_context(name, value, &LogContext::detached())
    }

    /// Like [`SchemaSet::validate`], logging under the caller's context.
    pub fn validate_with_context(
        &self,
        name: SchemaName,
        value: &Value,
        ctx: &LogContext,
    ) -> Result<Value, ValidationErrors> {
        let ctx = ctx.with_schema(name.as_str());
        crate::log_debug!(ctx, "VALIDATION_START");

        let rule = match self.schemas.get(&name) {
            Some(rule) => rule,
            None => {
                crate::log_error!(ctx, "SCHEMA_MISSING");
                return Err(ValidationErrors::single(FieldError::new(
                    &FieldPath::root(),
                    ErrorKind::Format,
                    format!("schema {} is not available", name),
                )));
            }
        };

        match rule.check(value, &FieldPath::root()) {
            Ok(normalized) => {
                crate::log_debug!(ctx, "VALIDATION_PASSED");
                Ok(normalized)
            }
            Err(errors) => {
                let errors = ValidationErrors(errors);
                crate::log_warn!(
                    ctx,
                    "VALIDATION_REJECTED",
                    errors = errors.len(),
                    fields = errors.paths()
                );
                Err(errors)
            }
        }
    }

    /// Validate against a schema looked up by its published name.
    pub fn validate_named(
        &self,
        name: &str,
        value: &Value,
    ) -> Result<Result<Value, ValidationErrors>, SchemaError> {
        let name: SchemaName = name.parse()?;
        Ok(self.validate(name, value))
    }

    /// Validate and deserialize into a typed model.
    pub fn validate_as<T: DeserializeOwned>(
        &self,
        name: SchemaName,
        value: &Value,
    ) -> Result<T, ValidationErrors> {
        let normalized = self.validate(name, value)?;
        serde_json::from_value(normalized).map_err(|e| {
            log::error!("MODEL_CONVERSION_FAILED schema={} error={}", name, e);
            ValidationErrors::single(FieldError::new(
                &FieldPath::root(),
                ErrorKind::Format,
                format!("accepted value does not fit the {} model: {}", name, e),
            ))
        })
    }

    pub fn webhook_receipt(&self, value: &Value) -> Result<WebhookReceipt, ValidationErrors> {
        self.validate_as(SchemaName::WebhookReceipt, value)
    }

    pub fn log_filter(&self, value: &Value) -> Result<LogFilter, ValidationErrors> {
        self.validate_as(SchemaName::SubscriptionLogFilter, value)
    }

    pub fn transaction_filter(&self, value: &Value) -> Result<TransactionFilter, ValidationErrors> {
        self.validate_as(SchemaName::SubscriptionTransactionFilter, value)
    }

    pub fn create_subscription_request(
        &self,
        value: &Value,
    ) -> Result<CreateSubscriptionRequest, ValidationErrors> {
        self.validate_as(SchemaName::CreateSubscriptionRequest, value)
    }

    pub fn subscription(&self, value: &Value) -> Result<Subscription, ValidationErrors> {
        self.validate_as(SchemaName::Subscription, value)
    }

    pub fn create_api_key_request(
        &self,
        value: &Value,
    ) -> Result<CreateApiKeyRequest, ValidationErrors> {
        self.validate_as(SchemaName::CreateApiKeyRequest, value)
    }

    pub fn api_key(&self, value: &Value) -> Result<ApiKey, ValidationErrors> {
        self.validate_as(SchemaName::ApiKey, value)
    }

    pub fn example_request(&self, value: &Value) -> Result<GetExampleRequest, ValidationErrors> {
        self.validate_as(SchemaName::GetExampleRequest, value)
    }
}

lazy_static! {
    static ref DEFAULT_SCHEMAS: SchemaSet =
        SchemaSet::new(TokenSets::default()).expect("default token sets are valid");
}

/// Process-wide schemas built from [`TokenSets::default`].
pub fn default_schemas() -> &'static SchemaSet {
    &DEFAULT_SCHEMAS
}
