use crate::definition::parameters::Parameters;
use crate::definition::response::{ResponseDefinition, StatusKey};
use crate::error::ValidationError;
use crate::schema::HttpMethod;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Resolved description of one operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDefinition {
    method: HttpMethod,
    operation_id: String,
    path_template: String,
    parameters: Parameters,
    content_types: Vec<String>,
    responses: IndexMap<StatusKey, ResponseDefinition>,
}

impl RequestDefinition {
    pub fn new(
        method: HttpMethod,
        operation_id: impl Into<String>,
        path_template: impl Into<String>,
        parameters: Parameters,
        content_types: Vec<String>,
        responses: impl IntoIterator<Item = ResponseDefinition>,
    ) -> Self {
        let responses = responses
            .into_iter()
            .map(|response| (response.status_code(), response))
            .collect();

        Self {
            method,
            operation_id: operation_id.into(),
            path_template: path_template.into(),
            parameters,
            content_types,
            responses,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn path_template(&self) -> &str {
        &self.path_template
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Content types accepted for the request body
    pub fn content_types(&self) -> &[String] {
        &self.content_types
    }

    pub fn responses(&self) -> impl Iterator<Item = &ResponseDefinition> {
        self.responses.values()
    }

    /// Finds the response for a status code, falling back to `default`
    pub fn response_definition(&self, status: u16) -> Result<&ResponseDefinition, ValidationError> {
        self.responses
            .get(&StatusKey::Exact(status))
            .or_else(|| self.responses.get(&StatusKey::Default))
            .ok_or_else(|| ValidationError::NoResponseDefinitionForStatus {
                method: self.method.as_str().to_string(),
                path: self.path_template.clone(),
                status,
            })
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

    pub fn path_schema(&self) -> Option<Value> {
        self.parameters.path_schema()
    }

    pub fn query_schema(&self) -> Option<Value> {
        self.parameters.query_schema()
    }

    pub fn form_data_schema(&self) -> Option<Value> {
        self.parameters.form_data_schema()
    }
}
