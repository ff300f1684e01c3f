use crate::error::ValidationError;
use crate::violation::{constraint_name, ConstraintViolation, ViolationLocation};
use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, Validator};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Compiles a Swagger (Draft 4 dialect) schema
pub fn build_validator(schema: &Value, error_context: &str) -> Result<Validator, ValidationError> {
    let mut prepared = schema.clone();
    strip_empty_required(&mut prepared);

    jsonschema::options()
        .with_draft(Draft::Draft4)
        .build(&prepared)
        .map_err(|e| {
            ValidationError::SchemaCompilation(format!(
                "Failed to compile schema for {}: {}",
                error_context, e
            ))
        })
}

/// Draft 4 requires `required` to be non-empty; synthesized schemas may carry `[]`
fn strip_empty_required(schema: &mut Value) {
    match schema {
        Value::Object(members) => {
            if members
                .get("required")
                .and_then(Value::as_array)
                .is_some_and(Vec::is_empty)
            {
                members.remove("required");
            }
            members.values_mut().for_each(strip_empty_required);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_empty_required),
        _ => {}
    }
}

/// Compiled validators keyed by the text of their schema.
///
/// Synthesized parameter schemas are rebuilt for every message, so entries
/// are looked up by content rather than by identity.
#[derive(Default)]
pub struct ValidatorCache {
    compiled: RwLock<HashMap<String, Arc<Validator>>>,
}

impl ValidatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the validator for `schema`, compiling it on first use
    pub fn get_or_compile(&self, schema: &Value, error_context: &str) -> Result<Arc<Validator>, ValidationError> {
        let key = schema.to_string();
        {
            let compiled = self.compiled.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(validator) = compiled.get(&key) {
                return Ok(Arc::clone(validator));
            }
        }

        let validator = Arc::new(build_validator(schema, error_context)?);
        log::trace!("Compiled {} schema", error_context);
        let mut compiled = self.compiled.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(compiled.entry(key).or_insert(validator)))
    }

    pub fn len(&self) -> usize {
        self.compiled.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validates `instance` and converts every error into a violation at `location`
pub fn schema_violations(
    validators: &ValidatorCache,
    instance: &Value,
    schema: &Value,
    location: ViolationLocation,
) -> Result<Vec<ConstraintViolation>, ValidationError> {
    let validator = validators.get_or_compile(schema, location.as_str())?;

    let violations = validator
        .iter_errors(instance)
        .map(|e| {
            let mut property = format_property_path(&e.instance_path.to_string());
            if let ValidationErrorKind::Required { property: missing } = &e.kind {
                if let Some(missing) = missing.as_str() {
                    append_segment(&mut property, missing);
                }
            }
            ConstraintViolation::new(property, e.to_string(), constraint_name(&e.kind), location)
        })
        .collect();
    Ok(violations)
}

/// Formats a JSON pointer (`/items/0/name`) as a dotted property (`items[0].name`)
pub fn format_property_path(instance_path: &str) -> String {
    let mut property = String::new();
    for segment in instance_path.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        append_segment(&mut property, &segment);
    }
    property
}

fn append_segment(property: &mut String, segment: &str) {
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        property.push('[');
        property.push_str(segment);
        property.push(']');
    } else {
        if !property.is_empty() {
            property.push('.');
        }
        property.push_str(segment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn formats_pointers_as_properties() {
        assert_eq!(format_property_path(""), "");
        assert_eq!(format_property_path("/name"), "name");
        assert_eq!(format_property_path("/items/0/name"), "items[0].name");
        assert_eq!(format_property_path("/a~1b"), "a/b");
    }

    #[test]
    fn accepts_synthesized_schemas_with_empty_required() {
        let schema = json!({"type": "object", "required": [], "properties": {"api_key": {"type": "string"}}});
        assert!(build_validator(&schema, "header").unwrap().is_valid(&json!({})));
    }

    #[test]
    fn reports_missing_required_property_by_name() {
        let schema = json!({
            "type": "object",
            "required": ["id"],
            "properties": {"id": {"type": "integer"}}
        });

        let violations = schema_violations(&ValidatorCache::new(), &json!({}), &schema, ViolationLocation::Path).unwrap();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].property(), "id");
        assert_eq!(violations[0].constraint(), "required");
        assert_eq!(violations[0].location(), ViolationLocation::Path);
    }

    #[test]
    fn reports_nested_type_errors() {
        let schema = json!({"type": "array", "items": {"type": "object", "properties": {"name": {"type": "string"}}}});

        let violations = schema_violations(
            &ValidatorCache::new(),
            &json!([{"name": "ok"}, {"name": 3}]),
            &schema,
            ViolationLocation::Body,
        )
        .unwrap();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].property(), "[1].name");
        assert_eq!(violations[0].constraint(), "type");
    }

    #[test]
    fn compiles_each_schema_once() {
        let validators = ValidatorCache::new();
        let schema = json!({"type": "object", "properties": {"id": {"type": "integer"}}});

        let first = validators.get_or_compile(&schema, "path").unwrap();
        let second = validators.get_or_compile(&schema.clone(), "path").unwrap();
        validators.get_or_compile(&json!({"type": "array"}), "body").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(validators.len(), 2);
    }

    #[test]
    fn failed_compilations_are_not_cached() {
        let validators = ValidatorCache::new();
        let err = validators.get_or_compile(&json!({"type": 12}), "body");
        assert!(matches!(err, Err(ValidationError::SchemaCompilation(_))));
        assert!(validators.is_empty());
    }
}
