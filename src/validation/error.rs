//! Validation failures and schema construction errors.

use std::fmt;

use serde::Serialize;
use serde_json::{json, Value};

/// Rule that a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Value does not match a fixed format (hex token, URI, UUID, JSON type).
    Format,
    /// Value is not a member of a closed token set.
    Enum,
    /// Filter value is neither null, a single valid value, nor a bounded array of them.
    FilterShape,
    /// String or array length outside its bounds.
    Range,
    /// Key not declared by a closed object schema.
    UnknownField,
    /// Mandatory key is absent.
    RequiredField,
    /// Collection that must be unique contains a repeat.
    Duplicate,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Format => "format",
            ErrorKind::Enum => "enum",
            ErrorKind::FilterShape => "filter_shape",
            ErrorKind::Range => "range",
            ErrorKind::UnknownField => "unknown_field",
            ErrorKind::RequiredField => "required_field",
            ErrorKind::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of a value inside the validated document.
///
/// Rendered as dotted keys with bracketed indices, e.g. `filters.topic0[2]`.
/// The document root is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{}", self.0, key))
        }
    }

    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: FieldPath,
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(path: &FieldPath, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            path: path.clone(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{} ({})", self.message, self.kind)
        } else {
            write!(f, "{}: {} ({})", self.path, self.message, self.kind)
        }
    }
}

/// Ordered list of violations returned when a payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("validation failed: {}", join_errors(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn join_errors(errors: &[FieldError]) -> String {
    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    rendered.join("; ")
}

impl ValidationErrors {
    pub fn single(error: FieldError) -> Self {
        Self(vec![error])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any violation sits exactly at `path` with the given kind.
    pub fn has(&self, path: &str, kind: ErrorKind) -> bool {
        self.0.iter().any(|e| e.path.as_str() == path && e.kind == kind)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.path.as_str()).collect()
    }

    /// JSON body for a 400 response: `{"errors": [{path, kind, message}, ...]}`.
    pub fn to_response_body(&self) -> Value {
        json!({ "errors": self.0 })
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Errors raised while building schemas. These are programmer or deployment
/// errors and should abort startup.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("token set {0} is empty")]
    EmptyTokenSet(&'static str),

    #[error("token set {0} contains an empty token")]
    EmptyToken(&'static str),

    #[error("token set {set} contains {token:?} more than once")]
    DuplicateToken { set: &'static str, token: String },

    #[error("subscription types must include the {0:?} discriminant")]
    MissingDiscriminant(String),

    #[error("token sets are not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("no schema named {0:?}")]
    UnknownSchema(String),
}
