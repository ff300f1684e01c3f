use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    // Raised while building a schema from a document
    #[error("file \"{0}\" does not provide a supported extension choose either json, yml or yaml")]
    UnsupportedFormat(String),

    #[error("Failed to retrieve document {location}: {message}")]
    DocumentRetrieval { location: String, message: String },

    #[error("Failed to parse document {location}: {message}")]
    DocumentParse { location: String, message: String },

    #[error("You need to provide an operationId for {0}")]
    MissingOperationId(String),

    #[error("You need to specify at least one response for {0}")]
    MissingResponses(String),

    #[error("operationId {operation_id} is used by both {first} and {second}")]
    DuplicateOperationId {
        operation_id: String,
        first: String,
        second: String,
    },

    #[error("Parameters cannot have {locations} locations at the same time in {path}")]
    ConflictingBodyLocations { locations: String, path: String },

    #[error("{0} is not a supported parameter location, supported: path, header, query, body, formData")]
    InvalidParameterLocation(String),

    #[error("Malformed parameter: {0}")]
    MalformedParameter(String),

    #[error("{status} is not a valid response status code in {operation}")]
    InvalidStatusCode { status: String, operation: String },

    #[error("Unable to resolve reference {0}")]
    UnresolvableReference(String),

    #[error("Reference {0} refers back to itself")]
    CyclicReference(String),

    #[error("Reference {reference} exceeds the maximum expansion depth of {max_depth}")]
    ReferenceDepthExceeded { reference: String, max_depth: usize },

    // Raised while looking things up in a built schema
    #[error("Unable to resolve the operationId for path {0}")]
    OperationNotFound(String),

    #[error("Unable to find request definition for operationId {0}")]
    UnknownOperationId(String),

    #[error("No response definition for {method} {path} is available for status code {status}")]
    NoResponseDefinitionForStatus {
        method: String,
        path: String,
        status: u16,
    },

    #[error("{format} is not a supported query collection format (parameter {name})")]
    UnsupportedCollectionFormat { name: String, format: String },

    // Raised while validating a message
    #[error("Failed to compile JSON schema: {0}")]
    SchemaCompilation(String),

    #[error("No decoder available for body format {0}")]
    UnsupportedBodyFormat(String),

    #[error("Failed to decode {format} body: {message}")]
    MalformedBody { format: String, message: String },

    // Raised by the schema cache
    #[error("Cached schema has format version {found}, expected {expected}")]
    CacheFormatMismatch { expected: u32, found: u32 },

    #[error("Failed to encode or decode cached schema: {0}")]
    CacheEncoding(String),

    #[error("Schema cache I/O failure: {0}")]
    CacheIo(#[from] std::io::Error),
}
