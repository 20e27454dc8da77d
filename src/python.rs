//! Python bindings for the default schema set.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::pipeline::{validate_body, RequestContext};
use crate::validation::schema::{default_schemas, SchemaName};

/// Validate a JSON body against a named schema.
///
/// # Arguments
/// * `schema` - Published schema name, e.g. "CreateSubscriptionRequest"
/// * `body` - Raw JSON request body
/// * `request_id` - Optional upstream request id for log correlation
///
/// # Returns
/// Dict with request_id, schema, accepted, value (JSON string or None) and errors
#[pyfunction]
#[pyo3(signature = (schema, body, request_id=None))]
fn validate_payload(
    py: Python<'_>,
    schema: &str,
    body: &str,
    request_id: Option<String>,
) -> PyResult<Py<PyAny>> {
    crate::init_logger();

    let name: SchemaName = schema
        .parse()
        .map_err(|e: crate::validation::SchemaError| PyValueError::new_err(e.to_string()))?;
    let ctx = match request_id.as_deref() {
        Some(id) => RequestContext::with_id(id),
        None => RequestContext::new(),
    };

    let outcome = validate_body(&ctx, default_schemas(), name, body);

    let py_result = PyDict::new(py);
    py_result.set_item("request_id", &outcome.request_id)?;
    py_result.set_item("schema", &outcome.schema)?;
    py_result.set_item("accepted", outcome.accepted)?;
    py_result.set_item("value", outcome.value.as_ref().map(|v| v.to_string()))?;

    let errors_list = PyList::empty(py);
    for error in &outcome.errors {
        let error_dict = PyDict::new(py);
        error_dict.set_item("path", error.path.as_str())?;
        error_dict.set_item("kind", error.kind.as_str())?;
        error_dict.set_item("message", &error.message)?;
        errors_list.append(error_dict)?;
    }
    py_result.set_item("errors", errors_list)?;

    Ok(py_result.into())
}

/// Published schema names.
#[pyfunction]
fn schema_names() -> PyResult<Vec<&'static str>> {
    Ok(SchemaName::ALL.iter().map(|n| n.as_str()).collect())
}

/// Python module definition
#[pymodule]
fn chainhook_core(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(validate_payload, m)?)?;
    m.add_function(wrap_pyfunction!(schema_names, m)?)?;
    Ok(())
}
