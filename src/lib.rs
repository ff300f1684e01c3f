pub mod config;
pub mod decoder;
pub mod definition;
pub mod error;
pub mod normalizer;
pub mod schema;
pub mod spec;
pub mod uri_template;
pub mod validation_helpers;
pub mod validators;
pub mod violation;

pub use config::{MessageValidatorConfig, SchemaFactoryConfig};
pub use decoder::{extract_format_from_content_type, BodyDecoder, DefaultBodyDecoder};
pub use definition::{
    Location, Parameter, Parameters, RequestDefinition, RequestDefinitions, ResponseDefinition, StatusKey,
};
pub use error::ValidationError;
pub use normalizer::{normalize, parse_query_string};
pub use schema::{HttpMethod, Schema, SCHEMA_FORMAT_VERSION};
pub use spec::{
    cache_key, CachedSchemaFactory, DirectorySchemaCache, DocumentRetriever, FileRetriever, InMemorySchemaCache,
    SchemaCache, SchemaFactory, SwaggerSchemaFactory,
};
pub use validation_helpers::ValidatorCache;
pub use validators::MessageValidator;
pub use violation::{ConstraintViolation, ValidationReport, ViolationLocation};
