use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Where a parameter travels in an HTTP message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
    Path,
    Header,
    Query,
    Body,
    FormData,
}

impl Location {
    pub const ALL: [Location; 5] = [
        Self::Path,
        Self::Header,
        Self::Query,
        Self::Body,
        Self::FormData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Header => "header",
            Self::Query => "query",
            Self::Body => "body",
            Self::FormData => "formData",
        }
    }

    /// True for the locations that carry the message body
    pub fn is_body(&self) -> bool {
        matches!(self, Self::Body | Self::FormData)
    }

    /// Content type implied by a body location when the document declares none
    pub fn default_content_type(&self) -> Option<&'static str> {
        match self {
            Self::Body => Some("application/json"),
            Self::FormData => Some("application/x-www-form-urlencoded"),
            _ => None,
        }
    }
}

impl FromStr for Location {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|location| location.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidParameterLocation(s.to_string()))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declared parameter of a request or response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    location: Location,
    name: String,
    required: bool,
    schema: Option<Value>,
}

impl Parameter {
    pub fn new(location: Location, name: impl Into<String>, required: bool, schema: Option<Value>) -> Self {
        Self {
            location,
            name: name.into(),
            required,
            schema,
        }
    }

    /// Builds a parameter from a textual location, rejecting unknown ones
    pub fn with_location_str(
        location: &str,
        name: impl Into<String>,
        required: bool,
        schema: Option<Value>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(location.parse()?, name, required, schema))
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }
}
