//! Raw request body validation.
//!
//! Handles one body at a time:
//! 1. JSON parsing (malformed bodies become a root-level format error)
//! 2. Validation against the named schema
//! 3. An outcome the caller can serialize into its response

use serde::Serialize;
use serde_json::Value;

use crate::validation::error::{ErrorKind, FieldError, FieldPath, ValidationErrors};
use crate::validation::schema::{SchemaName, SchemaSet};

use super::context::RequestContext;

/// Result of validating one request body.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub request_id: String,
    pub schema: String,
    pub accepted: bool,
    /// Normalized payload when accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub errors: Vec<FieldError>,
}

impl ValidationOutcome {
    fn accepted(ctx: &RequestContext, schema: SchemaName, value: Value) -> Self {
        Self {
            request_id: ctx.request_id.clone(),
            schema: schema.to_string(),
            accepted: true,
            value: Some(value),
            errors: Vec::new(),
        }
    }

    fn rejected(ctx: &RequestContext, schema: SchemaName, errors: ValidationErrors) -> Self {
        Self {
            request_id: ctx.request_id.clone(),
            schema: schema.to_string(),
            accepted: false,
            value: None,
            errors: errors.0,
        }
    }

    pub fn into_result(self) -> Result<Value, ValidationErrors> {
        match self.value {
            Some(value) if self.accepted => Ok(value),
            _ => Err(ValidationErrors(self.errors)),
        }
    }
}

/// Result of validating a batch of bodies against one schema.
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub schema: String,
    pub received_count: usize,
    pub accepted_count: usize,
    pub rejected_count: usize,
    pub outcomes: Vec<ValidationOutcome>,
}

/// Parse and validate a raw JSON body.
pub fn validate_body(
    ctx: &RequestContext,
    schemas: &SchemaSet,
    schema: SchemaName,
    body: &str,
) -> ValidationOutcome {
    let log_ctx = ctx.log_context().with_schema(schema.as_str());

    let payload: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            crate::log_warn!(log_ctx, "PAYLOAD_PARSE_FAILED", error = e.to_string());
            let error = FieldError::new(
                &FieldPath::root(),
                ErrorKind::Format,
                format!("body is not valid JSON: {}", e),
            );
            return ValidationOutcome::rejected(ctx, schema, ValidationErrors::single(error));
        }
    };

    match schemas.validate_with_context(schema, &payload, &ctx.log_context()) {
        Ok(value) => ValidationOutcome::accepted(ctx, schema, value),
        Err(errors) => ValidationOutcome::rejected(ctx, schema, errors),
    }
}

/// Validate several bodies against one schema, each under its own request id.
pub fn validate_batch(schemas: &SchemaSet, schema: SchemaName, bodies: &[String]) -> BatchOutcome {
    let outcomes: Vec<ValidationOutcome> = bodies
        .iter()
        .map(|body| validate_body(&RequestContext::new(), schemas, schema, body))
        .collect();

    let accepted_count = outcomes.iter().filter(|o| o.accepted).count();
    let rejected_count = outcomes.len() - accepted_count;

    log::info!(
        "BATCH_COMPLETE schema={} received={} accepted={} rejected={}",
        schema,
        bodies.len(),
        accepted_count,
        rejected_count
    );

    BatchOutcome {
        schema: schema.to_string(),
        received_count: bodies.len(),
        accepted_count,
        rejected_count,
        outcomes,
    }
}
