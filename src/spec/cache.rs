use crate::error::ValidationError;
use crate::schema::Schema;
use crate::spec::builder::SchemaFactory;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

/// Key under which the schema built from `location` is cached.
///
/// Derived from the location only: callers must invalidate the entry when
/// the document changes in place.
pub fn cache_key(location: &str) -> String {
    hex::encode(Sha256::digest(location.as_bytes()))
}

/// Storage for serialized schema blobs
pub trait SchemaCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ValidationError>;
    fn put(&self, key: &str, blob: Vec<u8>) -> Result<(), ValidationError>;
}

/// Process-local cache
#[derive(Debug, Default)]
pub struct InMemorySchemaCache {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemorySchemaCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchemaCache for InMemorySchemaCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ValidationError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, blob: Vec<u8>) -> Result<(), ValidationError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), blob);
        Ok(())
    }
}

/// One file per entry inside a directory
#[derive(Debug, Clone)]
pub struct DirectorySchemaCache {
    directory: PathBuf,
}

impl DirectorySchemaCache {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.schema.json", key))
    }
}

impl SchemaCache for DirectorySchemaCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ValidationError> {
        match fs::read(self.entry_path(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, blob: Vec<u8>) -> Result<(), ValidationError> {
        fs::create_dir_all(&self.directory)?;
        fs::write(self.entry_path(key), blob)?;
        Ok(())
    }
}

/// Serves schemas from a cache, building and storing them on a miss.
///
/// Entries written in another format version are rebuilt and overwritten.
pub struct CachedSchemaFactory<F, C> {
    factory: F,
    cache: C,
}

impl<F: SchemaFactory, C: SchemaCache> CachedSchemaFactory<F, C> {
    pub fn new(factory: F, cache: C) -> Self {
        Self { factory, cache }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl<F: SchemaFactory, C: SchemaCache> SchemaFactory for CachedSchemaFactory<F, C> {
    fn create_schema(&self, location: &str) -> Result<Schema, ValidationError> {
        let key = cache_key(location);

        if let Some(blob) = self.cache.get(&key)? {
            match Schema::from_blob(&blob) {
                Ok(schema) => {
                    log::debug!("Schema cache hit for {}", location);
                    return Ok(schema);
                }
                Err(e) => log::warn!("Discarding cached schema for {}: {}", location, e),
            }
        }

        let schema = self.factory.create_schema(location)?;
        self.cache.put(&key, schema.to_blob()?)?;
        Ok(schema)
    }
}
