//! Turns text-only query (and form) values into JSON Schema typed values.

use crate::error::ValidationError;
use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use serde_json::{Map, Number, Value};

/// Parses `a=1&b=2` into name/value pairs.
///
/// Names and values are percent-decoded (`+` meaning space). A pair without
/// `=` maps to an empty value and a repeated name keeps its last value.
pub fn parse_query_string(query: &str) -> IndexMap<String, String> {
    query
        .split('&')
        .filter(|item| !item.is_empty())
        .map(|item| match item.split_once('=') {
            Some((name, value)) => (decode_component(name), decode_component(value)),
            None => (decode_component(item), String::new()),
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Casts each raw value to the type its property declares in `schema`.
///
/// Values that do not parse as the declared type are kept as strings so the
/// schema validation reports them. Names without a property pass through.
pub fn normalize(raw: &IndexMap<String, String>, schema: &Value) -> Result<Map<String, Value>, ValidationError> {
    let properties = schema.get("properties").and_then(Value::as_object);

    raw.iter()
        .map(|(name, value)| {
            let normalized = match properties.and_then(|p| p.get(name)) {
                Some(property) => normalize_value(name, value, property)?,
                None => Value::String(value.clone()),
            };
            Ok((name.clone(), normalized))
        })
        .collect()
}

fn normalize_value(name: &str, raw: &str, property: &Value) -> Result<Value, ValidationError> {
    match property.get("type").and_then(Value::as_str) {
        Some("array") => {
            let separator = collection_separator(name, property.get("collectionFormat"))?;
            let items = property.get("items").filter(|items| items.is_object());
            Ok(Value::Array(
                raw.split(separator)
                    .map(|item| match items {
                        Some(items) => cast_scalar(item, items),
                        None => Value::String(item.to_string()),
                    })
                    .collect(),
            ))
        }
        _ => Ok(cast_scalar(raw, property)),
    }
}

fn collection_separator(name: &str, format: Option<&Value>) -> Result<char, ValidationError> {
    match format.and_then(Value::as_str) {
        None | Some("csv") | Some("multi") => Ok(','),
        Some("ssv") => Ok(' '),
        Some("tsv") => Ok('\t'),
        Some("pipes") => Ok('|'),
        Some(other) => Err(ValidationError::UnsupportedCollectionFormat {
            name: name.to_string(),
            format: other.to_string(),
        }),
    }
}

/// Casts one string according to the `type` of `schema`, leaving it untouched when it does not parse
pub fn cast_scalar(raw: &str, schema: &Value) -> Value {
    let original = || Value::String(raw.to_string());

    match schema.get("type").and_then(Value::as_str) {
        Some("integer") => raw.parse::<i64>().map(Value::from).unwrap_or_else(|_| original()),
        Some("number") => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(original),
        Some("boolean") => match raw {
            "true" | "1" => Value::Bool(true),
            "false" | "0" => Value::Bool(false),
            _ => original(),
        },
        _ => original(),
    }
}
