//! Filter-value combinator.
//!
//! Wraps an element rule into "null | single value | 1..=100 values".
//! The same combinator backs address, topic and method-signature filters.

use serde_json::Value;

use super::error::{ErrorKind, FieldError, FieldPath};
use super::rules::{Rule, RuleResult};

/// Upper bound on values in one filter array.
pub const MAX_FILTER_VALUES: usize = 100;

/// Filter value over an element rule `R`.
#[derive(Debug, Clone)]
pub struct FilterOption<R> {
    item: R,
}

/// Build the filter-value rule for `item`.
pub fn filter_option<R: Rule>(item: R) -> FilterOption<R> {
    FilterOption { item }
}

impl<R: Rule> FilterOption<R> {
    fn shape_error(&self, path: &FieldPath, detail: &str) -> FieldError {
        FieldError::new(
            path,
            ErrorKind::FilterShape,
            format!("{}; expected {}", detail, self.expected()),
        )
    }
}

impl<R: Rule> Rule for FilterOption<R> {
    fn check(&self, value: &Value, path: &FieldPath) -> RuleResult {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Array(items) if items.is_empty() => {
                Err(vec![self.shape_error(path, "array must not be empty")])
            }
            Value::Array(items) if items.len() > MAX_FILTER_VALUES => Err(vec![self.shape_error(
                path,
                &format!("array has {} values", items.len()),
            )]),
            Value::Array(items) => {
                let mut normalized = Vec::with_capacity(items.len());
                let mut errors = Vec::new();
                for (i, item) in items.iter().enumerate() {
                    let item_path = path.index(i);
                    match self.item.check(item, &item_path) {
                        Ok(v) => normalized.push(v),
                        Err(inner) => errors.extend(
                            inner
                                .into_iter()
                                .map(|e| self.shape_error(&item_path, &e.message)),
                        ),
                    }
                }
                if errors.is_empty() {
                    Ok(Value::Array(normalized))
                } else {
                    Err(errors)
                }
            }
            single => self.item.check(single, path).map_err(|inner| {
                inner
                    .into_iter()
                    .map(|e| self.shape_error(path, &e.message))
                    .collect()
            }),
        }
    }

    fn expected(&self) -> String {
        format!(
            "null, a {0}, or an array of 1 to {1} of {0}",
            self.item.expected(),
            MAX_FILTER_VALUES
        )
    }
}
