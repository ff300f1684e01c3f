use crate::definition::{RequestDefinition, RequestDefinitions};
use crate::error::ValidationError;
use crate::uri_template;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// HTTP methods supported by Swagger operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::DELETE => "DELETE",
            Self::PATCH => "PATCH",
            Self::HEAD => "HEAD",
            Self::OPTIONS => "OPTIONS",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::GET),
            "POST" => Ok(Self::POST),
            "PUT" => Ok(Self::PUT),
            "DELETE" => Ok(Self::DELETE),
            "PATCH" => Ok(Self::PATCH),
            "HEAD" => Ok(Self::HEAD),
            "OPTIONS" => Ok(Self::OPTIONS),
            _ => Err(()),
        }
    }
}

impl TryFrom<&http::Method> for HttpMethod {
    type Error = ();

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

/// Version written into every serialized schema blob
pub const SCHEMA_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct BlobRef<'a> {
    format_version: u32,
    schema: &'a Schema,
}

#[derive(Deserialize)]
struct BlobVersion {
    format_version: u32,
}

#[derive(Deserialize)]
struct Blob {
    schema: Schema,
}

/// A resolved API document: every operation plus the document's addressing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    request_definitions: RequestDefinitions,
    base_path: String,
    host: String,
    schemes: Vec<String>,
}

impl Schema {
    pub fn new(
        request_definitions: RequestDefinitions,
        base_path: impl Into<String>,
        host: impl Into<String>,
        schemes: Vec<String>,
    ) -> Self {
        Self {
            request_definitions,
            base_path: base_path.into(),
            host: host.into(),
            schemes,
        }
    }

    /// Finds the operationId serving `method` on a concrete `path`.
    ///
    /// Definitions are scanned in document order and the first one whose
    /// template matches wins.
    pub fn find_operation_id(&self, method: &str, path: &str) -> Result<&str, ValidationError> {
        let method = HttpMethod::from_str(method)
            .map_err(|_| ValidationError::OperationNotFound(path.to_string()))?;

        self.request_definitions
            .iter()
            .filter(|definition| definition.method() == method)
            .find(|definition| is_matching_path(definition.path_template(), path))
            .map(RequestDefinition::operation_id)
            .ok_or_else(|| ValidationError::OperationNotFound(path.to_string()))
    }

    /// Routes and looks up in one step
    pub fn find_request_definition(&self, method: &str, path: &str) -> Result<&RequestDefinition, ValidationError> {
        let operation_id = self.find_operation_id(method, path)?;
        self.request_definition(operation_id)
    }

    pub fn request_definitions(&self) -> &RequestDefinitions {
        &self.request_definitions
    }

    pub fn request_definition(&self, operation_id: &str) -> Result<&RequestDefinition, ValidationError> {
        self.request_definitions.get(operation_id)
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }

    /// Serializes the schema into a versioned blob
    pub fn to_blob(&self) -> Result<Vec<u8>, ValidationError> {
        serde_json::to_vec(&BlobRef {
            format_version: SCHEMA_FORMAT_VERSION,
            schema: self,
        })
        .map_err(|e| ValidationError::CacheEncoding(e.to_string()))
    }

    /// Restores a schema written by [`Schema::to_blob`], rejecting other format versions
    pub fn from_blob(bytes: &[u8]) -> Result<Self, ValidationError> {
        let version: BlobVersion =
            serde_json::from_slice(bytes).map_err(|e| ValidationError::CacheEncoding(e.to_string()))?;
        if version.format_version != SCHEMA_FORMAT_VERSION {
            return Err(ValidationError::CacheFormatMismatch {
                expected: SCHEMA_FORMAT_VERSION,
                found: version.format_version,
            });
        }

        let blob: Blob =
            serde_json::from_slice(bytes).map_err(|e| ValidationError::CacheEncoding(e.to_string()))?;
        Ok(blob.schema)
    }
}

fn is_matching_path(path_template: &str, path: &str) -> bool {
    path_template == path || uri_template::extract(path_template, path).is_some()
}
