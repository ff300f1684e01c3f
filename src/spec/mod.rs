pub mod builder;
pub mod cache;
pub mod loader;
pub mod reference_resolver;

pub use builder::{SchemaFactory, SwaggerSchemaFactory};
pub use cache::{cache_key, CachedSchemaFactory, DirectorySchemaCache, InMemorySchemaCache, SchemaCache};
pub use loader::{DocumentFormat, DocumentRetriever, FileRetriever};
pub use reference_resolver::ReferenceResolver;
