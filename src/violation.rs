use jsonschema::error::ValidationErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Part of the message a violation was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationLocation {
    Header,
    Path,
    Query,
    Body,
}

impl ViolationLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Path => "path",
            Self::Query => "query",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for ViolationLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single mismatch between message data and its declared schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    property: String,
    message: String,
    constraint: String,
    location: ViolationLocation,
}

impl ConstraintViolation {
    pub fn new(
        property: impl Into<String>,
        message: impl Into<String>,
        constraint: impl Into<String>,
        location: ViolationLocation,
    ) -> Self {
        Self {
            property: property.into(),
            message: message.into(),
            constraint: constraint.into(),
            location,
        }
    }

    /// Dotted path of the offending value (`items[0].name`), empty for the root
    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// JSON Schema keyword that failed, e.g. `required` or `type`
    pub fn constraint(&self) -> &str {
        &self.constraint
    }

    pub fn location(&self) -> ViolationLocation {
        self.location
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} at {}: {}",
            self.constraint, self.location, self.property, self.message
        )
    }
}

/// Outcome of validating one message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    violations: Vec<ConstraintViolation>,
}

impl ValidationReport {
    pub fn new(violations: Vec<ConstraintViolation>) -> Self {
        Self { violations }
    }

    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn violations(&self) -> &[ConstraintViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<ConstraintViolation> {
        self.violations
    }
}

/// Maps a validation error kind to the JSON Schema keyword that produced it
pub fn constraint_name(kind: &ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::Type { .. } => "type",
        ValidationErrorKind::Required { .. } => "required",
        ValidationErrorKind::Enum { .. } => "enum",
        ValidationErrorKind::Format { .. } => "format",
        ValidationErrorKind::Pattern { .. } => "pattern",
        ValidationErrorKind::Minimum { .. } => "minimum",
        ValidationErrorKind::Maximum { .. } => "maximum",
        ValidationErrorKind::ExclusiveMinimum { .. } => "exclusiveMinimum",
        ValidationErrorKind::ExclusiveMaximum { .. } => "exclusiveMaximum",
        ValidationErrorKind::MultipleOf { .. } => "multipleOf",
        ValidationErrorKind::MinLength { .. } => "minLength",
        ValidationErrorKind::MaxLength { .. } => "maxLength",
        ValidationErrorKind::MinItems { .. } => "minItems",
        ValidationErrorKind::MaxItems { .. } => "maxItems",
        ValidationErrorKind::UniqueItems { .. } => "uniqueItems",
        ValidationErrorKind::MinProperties { .. } => "minProperties",
        ValidationErrorKind::MaxProperties { .. } => "maxProperties",
        ValidationErrorKind::AdditionalProperties { .. } => "additionalProperties",
        ValidationErrorKind::AdditionalItems { .. } => "additionalItems",
        ValidationErrorKind::AnyOf { .. } => "anyOf",
        ValidationErrorKind::OneOfNotValid { .. } | ValidationErrorKind::OneOfMultipleValid { .. } => "oneOf",
        ValidationErrorKind::Not { .. } => "not",
        ValidationErrorKind::Constant { .. } => "const",
        _ => "schema",
    }
}
