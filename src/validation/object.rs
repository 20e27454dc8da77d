//! Closed object schemas and `type`-discriminated filter dispatch.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::tokens::{LOG_TYPE, TRANSACTION_TYPE};
use crate::models::SubscriptionKind;

use super::error::{ErrorKind, FieldError, FieldPath};
use super::rules::{fail, json_type, Rule, RuleResult};

#[derive(Clone)]
struct Field {
    name: &'static str,
    rule: Arc<dyn Rule>,
    required: bool,
}

/// Which filter schema applies when the discriminant is not the other kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchDefault {
    /// Only the `log` token selects log filters; anything else, transaction.
    Transaction,
    /// Only the `transaction` token selects transaction filters; anything
    /// else, including an absent discriminant, log.
    Log,
}

impl BranchDefault {
    /// Filter kind chosen for a discriminant value.
    pub fn select(self, discriminant: Option<&str>) -> SubscriptionKind {
        match (self, discriminant) {
            (BranchDefault::Transaction, Some(LOG_TYPE)) => SubscriptionKind::Log,
            (BranchDefault::Transaction, _) => SubscriptionKind::Transaction,
            (BranchDefault::Log, Some(TRANSACTION_TYPE)) => SubscriptionKind::Transaction,
            (BranchDefault::Log, _) => SubscriptionKind::Log,
        }
    }
}

/// Selects the schema for `target` from the sibling `discriminant` field.
#[derive(Clone)]
pub struct FilterBranch {
    discriminant: &'static str,
    target: &'static str,
    default: BranchDefault,
    log: Arc<ObjectSchema>,
    transaction: Arc<ObjectSchema>,
}

impl FilterBranch {
    pub fn new(
        discriminant: &'static str,
        target: &'static str,
        default: BranchDefault,
        log: ObjectSchema,
        transaction: ObjectSchema,
    ) -> Self {
        Self {
            discriminant,
            target,
            default,
            log: Arc::new(log),
            transaction: Arc::new(transaction),
        }
    }

    pub fn select(&self, discriminant: Option<&str>) -> SubscriptionKind {
        self.default.select(discriminant)
    }

    fn schema_for(&self, kind: SubscriptionKind) -> &ObjectSchema {
        match kind {
            SubscriptionKind::Log => &self.log,
            SubscriptionKind::Transaction => &self.transaction,
        }
    }
}

/// Object with declared keys. Undeclared keys are rejected.
#[derive(Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<Field>,
    branch: Option<FilterBranch>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(self, name: &'static str, rule: impl Rule + 'static) -> Self {
        self.field(name, rule, true)
    }

    pub fn optional(self, name: &'static str, rule: impl Rule + 'static) -> Self {
        self.field(name, rule, false)
    }

    fn field(mut self, name: &'static str, rule: impl Rule + 'static, required: bool) -> Self {
        self.fields.retain(|f| f.name != name);
        self.fields.push(Field {
            name,
            rule: Arc::new(rule),
            required,
        });
        self
    }

    /// Validate the branch target with a schema chosen from the discriminant.
    /// The target is always required.
    pub fn branch(mut self, branch: FilterBranch) -> Self {
        self.branch = Some(branch);
        self
    }

    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.fields.iter().map(|f| f.name).collect();
        if let Some(branch) = &self.branch {
            keys.push(branch.target);
        }
        keys
    }

    fn declares(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.name == key)
            || self.branch.as_ref().is_some_and(|b| b.target == key)
    }
}

impl Rule for ObjectSchema {
    fn check(&self, value: &Value, path: &FieldPath) -> RuleResult {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return fail(
                    path,
                    ErrorKind::Format,
                    format!("must be an object, got {}", json_type(other)),
                )
            }
        };

        let mut normalized = Map::new();
        let mut errors = Vec::new();
        let mut rejected: HashSet<&str> = HashSet::new();

        for field in &self.fields {
            let field_path = path.key(field.name);
            match object.get(field.name) {
                Some(v) => match field.rule.check(v, &field_path) {
                    Ok(n) => {
                        normalized.insert(field.name.to_string(), n);
                    }
                    Err(mut e) => {
                        rejected.insert(field.name);
                        errors.append(&mut e);
                    }
                },
                None if field.required => {
                    rejected.insert(field.name);
                    errors.push(FieldError::new(
                        &field_path,
                        ErrorKind::RequiredField,
                        "is required",
                    ));
                }
                None => {}
            }
        }

        if let Some(branch) = &self.branch {
            let target_path = path.key(branch.target);
            match object.get(branch.target) {
                None => errors.push(FieldError::new(
                    &target_path,
                    ErrorKind::RequiredField,
                    "is required",
                )),
                Some(_) if rejected.contains(branch.discriminant) => {
                    log::debug!(
                        "FILTER_BRANCH_SKIPPED path={} discriminant={}",
                        target_path,
                        branch.discriminant
                    );
                }
                Some(target) => {
                    let discriminant = normalized.get(branch.discriminant).and_then(Value::as_str);
                    let kind = branch.select(discriminant);
                    log::debug!("FILTER_BRANCH path={} kind={}", target_path, kind.as_str());
                    match branch.schema_for(kind).check(target, &target_path) {
                        Ok(n) => {
                            normalized.insert(branch.target.to_string(), n);
                        }
                        Err(mut e) => errors.append(&mut e),
                    }
                }
            }
        }

        for key in object.keys() {
            if !self.declares(key) {
                errors.push(FieldError::new(
                    &path.key(key),
                    ErrorKind::UnknownField,
                    "is not allowed",
                ));
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(normalized))
        } else {
            Err(errors)
        }
    }

    fn expected(&self) -> String {
        format!("object with keys {:?}", self.keys())
    }
}
