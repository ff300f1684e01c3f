use crate::error::ValidationError;
use crate::normalizer::{normalize, parse_query_string};
use crate::uri_template;
use crate::validation_helpers::{schema_violations, ValidatorCache};
use crate::violation::{ConstraintViolation, ViolationLocation};
use http::header::{AsHeaderName, HeaderMap};
use indexmap::IndexMap;
use serde_json::Value;

/// All values of a header joined with `, `
pub fn header_line<K: AsHeaderName>(headers: &HeaderMap, name: K) -> String {
    headers
        .get_all(name)
        .iter()
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Header values keyed case-insensitively.
///
/// A header takes the spelling its schema declares (`X-Rate-Limit`), and is
/// lower-cased when the schema does not mention it.
pub fn header_values(headers: &HeaderMap, schema: &Value) -> IndexMap<String, String> {
    let declared: Vec<&String> = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|properties| properties.keys().collect())
        .unwrap_or_default();

    headers
        .keys()
        .map(|name| {
            let key = declared
                .iter()
                .find(|declared| declared.eq_ignore_ascii_case(name.as_str()))
                .map(|declared| declared.to_string())
                .unwrap_or_else(|| name.as_str().to_string());
            (key, header_line(headers, name))
        })
        .collect()
}

/// Validates message headers against the synthesized header schema
pub fn validate_headers(
    validators: &ValidatorCache,
    headers: &HeaderMap,
    schema: Option<Value>,
) -> Result<Vec<ConstraintViolation>, ValidationError> {
    let Some(schema) = schema else {
        return Ok(Vec::new());
    };

    let instance = Value::Object(normalize(&header_values(headers, &schema), &schema)?);
    schema_violations(validators, &instance, &schema, ViolationLocation::Header)
}

/// Validates the variables of `path` extracted with `template`
pub fn validate_path(
    validators: &ValidatorCache,
    path: &str,
    template: &str,
    schema: Option<Value>,
) -> Result<Vec<ConstraintViolation>, ValidationError> {
    let Some(schema) = schema else {
        return Ok(Vec::new());
    };

    let variables = uri_template::extract(template, path).unwrap_or_default();
    let instance = Value::Object(normalize(&variables, &schema)?);
    schema_violations(validators, &instance, &schema, ViolationLocation::Path)
}

/// Validates a raw query string once its values are normalized
pub fn validate_query(
    validators: &ValidatorCache,
    query: Option<&str>,
    schema: Option<Value>,
) -> Result<Vec<ConstraintViolation>, ValidationError> {
    let Some(schema) = schema else {
        return Ok(Vec::new());
    };

    let raw = parse_query_string(query.unwrap_or(""));
    let instance = Value::Object(normalize(&raw, &schema)?);
    schema_violations(validators, &instance, &schema, ViolationLocation::Query)
}
