//! Leaf rules and the `Rule` trait every schema fragment implements.
//!
//! A rule inspects one JSON value at a known path and either returns the
//! normalized value or the list of violations found beneath that path.

use std::collections::HashSet;

use serde_json::{Number as JsonNumber, Value};

use super::error::{ErrorKind, FieldError, FieldPath};

/// Normalized value on success, every violation found on failure.
pub type RuleResult = Result<Value, Vec<FieldError>>;

/// A composable validation rule.
///
/// Rules hold no mutable state; one instance is shared by every request.
pub trait Rule: Send + Sync {
    /// Validate `value` located at `path`.
    fn check(&self, value: &Value, path: &FieldPath) -> RuleResult;

    /// Short description of an acceptable value, used in messages.
    fn expected(&self) -> String;
}

pub(crate) fn fail(path: &FieldPath, kind: ErrorKind, message: impl Into<String>) -> RuleResult {
    Err(vec![FieldError::new(path, kind, message)])
}

/// Borrow a non-empty string or report why the value is not one.
pub(crate) fn expect_str<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a str, Vec<FieldError>> {
    match value {
        Value::String(s) if s.is_empty() => Err(vec![FieldError::new(
            path,
            ErrorKind::Range,
            "must not be empty",
        )]),
        Value::String(s) => Ok(s),
        other => Err(vec![FieldError::new(
            path,
            ErrorKind::Format,
            format!("must be a string, got {}", json_type(other)),
        )]),
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Coerce a JSON value to a number. Numeric strings are accepted.
pub fn value_to_number(value: &Value) -> Option<JsonNumber> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            if let Ok(i) = s.parse::<i64>() {
                return Some(JsonNumber::from(i));
            }
            s.parse::<f64>().ok().and_then(JsonNumber::from_f64)
        }
        _ => None,
    }
}

/// Coerce a JSON value to a boolean. Only `true`/`false` strings are accepted.
pub fn value_to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Plain string with character-count bounds.
#[derive(Debug, Clone, Copy)]
pub struct Text {
    min: usize,
    max: Option<usize>,
}

impl Text {
    /// Any non-empty string.
    pub fn any() -> Self {
        Self { min: 1, max: None }
    }

    pub fn bounded(min: usize, max: usize) -> Self {
        Self {
            min: min.max(1),
            max: Some(max),
        }
    }
}

impl Rule for Text {
    fn check(&self, value: &Value, path: &FieldPath) -> RuleResult {
        let s = expect_str(value, path)?;
        let len = s.chars().count();
        if len < self.min {
            return fail(
                path,
                ErrorKind::Range,
                format!("must be at least {} characters", self.min),
            );
        }
        if let Some(max) = self.max {
            if len > max {
                return fail(
                    path,
                    ErrorKind::Range,
                    format!("must be at most {} characters", max),
                );
            }
        }
        Ok(Value::String(s.to_string()))
    }

    fn expected(&self) -> String {
        match self.max {
            Some(max) => format!("string of {} to {} characters", self.min, max),
            None => "non-empty string".to_string(),
        }
    }
}

/// Finite number, or a string holding one.
#[derive(Debug, Clone, Copy)]
pub struct Number;

impl Rule for Number {
    fn check(&self, value: &Value, path: &FieldPath) -> RuleResult {
        match value_to_number(value) {
            Some(n) => Ok(Value::Number(n)),
            None => fail(
                path,
                ErrorKind::Format,
                format!("must be a number, got {}", json_type(value)),
            ),
        }
    }

    fn expected(&self) -> String {
        "number".to_string()
    }
}

/// Boolean, or the strings `true`/`false`.
#[derive(Debug, Clone, Copy)]
pub struct Boolean;

impl Rule for Boolean {
    fn check(&self, value: &Value, path: &FieldPath) -> RuleResult {
        match value_to_bool(value) {
            Some(b) => Ok(Value::Bool(b)),
            None => fail(
                path,
                ErrorKind::Format,
                format!("must be a boolean, got {}", json_type(value)),
            ),
        }
    }

    fn expected(&self) -> String {
        "boolean".to_string()
    }
}

/// Membership in a closed token set.
#[derive(Debug, Clone)]
pub struct OneOf {
    set: &'static str,
    tokens: Vec<String>,
}

impl OneOf {
    pub fn new(set: &'static str, tokens: &[String]) -> Self {
        Self {
            set,
            tokens: tokens.to_vec(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }
}

impl Rule for OneOf {
    fn check(&self, value: &Value, path: &FieldPath) -> RuleResult {
        let s = expect_str(value, path)?;
        if self.contains(s) {
            Ok(Value::String(s.to_string()))
        } else {
            fail(
                path,
                ErrorKind::Enum,
                format!("must be one of {:?}", self.tokens),
            )
        }
    }

    fn expected(&self) -> String {
        format!("one of {}", self.set)
    }
}

/// Array of items sharing one rule, with length bounds and optional uniqueness.
#[derive(Debug, Clone)]
pub struct ListOf<R> {
    item: R,
    min: usize,
    max: Option<usize>,
    unique: bool,
}

impl<R: Rule> ListOf<R> {
    pub fn new(item: R) -> Self {
        Self {
            item,
            min: 0,
            max: None,
            unique: false,
        }
    }

    pub fn min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

impl<R: Rule> Rule for ListOf<R> {
    fn check(&self, value: &Value, path: &FieldPath) -> RuleResult {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return fail(
                    path,
                    ErrorKind::Format,
                    format!("must be an array, got {}", json_type(other)),
                )
            }
        };

        if items.len() < self.min {
            return fail(
                path,
                ErrorKind::Range,
                format!("must contain at least {} items", self.min),
            );
        }
        if let Some(max) = self.max {
            if items.len() > max {
                return fail(
                    path,
                    ErrorKind::Range,
                    format!("must contain at most {} items", max),
                );
            }
        }

        let mut normalized = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for (i, item) in items.iter().enumerate() {
            match self.item.check(item, &path.index(i)) {
                Ok(v) => normalized.push((i, v)),
                Err(mut e) => errors.append(&mut e),
            }
        }

        if self.unique {
            let mut seen = HashSet::new();
            for (i, v) in &normalized {
                if !seen.insert(v.to_string()) {
                    errors.push(FieldError::new(
                        &path.index(*i),
                        ErrorKind::Duplicate,
                        format!("duplicates an earlier item {}", v),
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(Value::Array(normalized.into_iter().map(|(_, v)| v).collect()))
        } else {
            Err(errors)
        }
    }

    fn expected(&self) -> String {
        format!("array of {}", self.item.expected())
    }
}
