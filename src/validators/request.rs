use crate::decoder::{extract_format_from_content_type, BodyDecoder};
use crate::definition::Location;
use crate::error::ValidationError;
use crate::normalizer::{normalize, parse_query_string};
use crate::validation_helpers::{schema_violations, ValidatorCache};
use crate::validators::parameter::header_line;
use crate::violation::{ConstraintViolation, ViolationLocation};
use http::header::{HeaderMap, CONTENT_TYPE};
use serde_json::Value;

const FORM_URLENCODED: &str = "x-www-form-urlencoded";

/// Checks the `Content-Type` header against the declared content types.
///
/// Returns the violation when the media type (parameters after `;` ignored)
/// is missing or not declared. A definition without content types accepts
/// any media type.
pub fn validate_content_type(headers: &HeaderMap, content_types: &[String]) -> Option<ConstraintViolation> {
    if content_types.is_empty() {
        return None;
    }

    let header = header_line(headers, CONTENT_TYPE);
    let media_type = header.split(';').next().unwrap_or("").trim();

    if content_types.iter().any(|declared| declared.eq_ignore_ascii_case(media_type)) {
        return None;
    }

    let (message, constraint) = if media_type.is_empty() {
        ("Content-Type should not be empty".to_string(), "required")
    } else {
        (
            format!(
                "{} is not a supported content type, supported: {}",
                header,
                content_types.join(", ")
            ),
            "enum",
        )
    };

    Some(ConstraintViolation::new(
        "Content-Type",
        message,
        constraint,
        ViolationLocation::Header,
    ))
}

/// Decodes a body according to its `Content-Type` and validates it.
///
/// An empty body is not validated. A body sent without `Content-Type` is
/// read as the default body content type (JSON). A body that fails to
/// decode is reported as a single `decode` violation.
pub fn validate_body<D: BodyDecoder + ?Sized>(
    validators: &ValidatorCache,
    decoder: &D,
    headers: &HeaderMap,
    body: &[u8],
    schema: &Value,
) -> Result<Vec<ConstraintViolation>, ValidationError> {
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let content_type = header_line(headers, CONTENT_TYPE);
    let content_type = match content_type.trim() {
        "" => Location::Body.default_content_type().unwrap_or_default(),
        declared => declared,
    };

    let format = extract_format_from_content_type(content_type);
    match decoder.decode(body, &format) {
        Ok(decoded) => schema_violations(validators, &decoded, schema, ViolationLocation::Body),
        Err(ValidationError::MalformedBody { format, message }) => Ok(vec![ConstraintViolation::new(
            "",
            format!("Unable to decode {} body: {}", format, message),
            "decode",
            ViolationLocation::Body,
        )]),
        Err(e) => Err(e),
    }
}

/// Validates an urlencoded form body against the synthesized formData schema.
///
/// Other encodings (e.g. multipart uploads) are not inspected.
pub fn validate_form_body(
    validators: &ValidatorCache,
    headers: &HeaderMap,
    body: &[u8],
    schema: &Value,
) -> Result<Vec<ConstraintViolation>, ValidationError> {
    let format = extract_format_from_content_type(&header_line(headers, CONTENT_TYPE));
    if format != FORM_URLENCODED {
        log::debug!("Skipping form validation for {} body", format);
        return Ok(Vec::new());
    }

    let raw = parse_query_string(&String::from_utf8_lossy(body));
    let instance = Value::Object(normalize(&raw, schema)?);
    schema_violations(validators, &instance, schema, ViolationLocation::Body)
}
