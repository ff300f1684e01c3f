use crate::schema::HttpMethod;
use serde::Deserialize;

/// Configuration for [`SwaggerSchemaFactory`](crate::spec::SwaggerSchemaFactory)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchemaFactoryConfig {
    /// Maximum number of nested `$ref` expansions (Default: 64)
    pub max_reference_depth: usize,

    /// Schemes used when the document declares none (Default: ["http"])
    pub default_schemes: Vec<String>,
}

impl Default for SchemaFactoryConfig {
    fn default() -> Self {
        Self {
            max_reference_depth: 64,
            default_schemes: vec!["http".to_string()],
        }
    }
}

/// Configuration for [`MessageValidator`](crate::validators::MessageValidator)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MessageValidatorConfig {
    /// Request methods whose body is decoded and validated (Default: PUT, PATCH, POST)
    pub body_methods: Vec<HttpMethod>,
}

impl Default for MessageValidatorConfig {
    fn default() -> Self {
        Self {
            body_methods: vec![HttpMethod::PUT, HttpMethod::PATCH, HttpMethod::POST],
        }
    }
}
