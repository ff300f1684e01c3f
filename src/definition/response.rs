use crate::definition::parameters::Parameters;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Key of a declared response: an exact status code or the `default` fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKey {
    Exact(u16),
    Default,
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(code) => write!(f, "{}", code),
            Self::Default => f.write_str("default"),
        }
    }
}

impl FromStr for StatusKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "default" {
            return Ok(Self::Default);
        }
        s.parse::<u16>().map(Self::Exact).map_err(|_| ())
    }
}

impl From<u16> for StatusKey {
    fn from(code: u16) -> Self {
        Self::Exact(code)
    }
}

// Serialized as text so it can key a JSON object
impl Serialize for StatusKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StatusKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| de::Error::custom(format!("invalid status key {}", raw)))
    }
}

/// Expected shape of one response of an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDefinition {
    status_code: StatusKey,
    content_types: Vec<String>,
    parameters: Parameters,
}

impl ResponseDefinition {
    pub fn new(status_code: StatusKey, content_types: Vec<String>, parameters: Parameters) -> Self {
        Self {
            status_code,
            content_types,
            parameters,
        }
    }

    pub fn status_code(&self) -> StatusKey {
        self.status_code
    }

    /// Supported response content types
    pub fn content_types(&self) -> &[String] {
        &self.content_types
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn has_body_schema(&self) -> bool {
        self.parameters.has_body_schema()
    }

    pub fn body_schema(&self) -> Option<&Value> {
        self.parameters.body_schema()
    }

    pub fn headers_schema(&self) -> Option<Value> {
        self.parameters.headers_schema()
    }
}
