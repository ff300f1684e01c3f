use crate::definition::request::RequestDefinition;
use crate::error::ValidationError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// All operations of a document, keyed by operationId in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestDefinitions {
    definitions: IndexMap<String, RequestDefinition>,
}

impl RequestDefinitions {
    pub fn new(definitions: impl IntoIterator<Item = RequestDefinition>) -> Self {
        Self {
            definitions: definitions
                .into_iter()
                .map(|definition| (definition.operation_id().to_string(), definition))
                .collect(),
        }
    }

    pub fn get(&self, operation_id: &str) -> Result<&RequestDefinition, ValidationError> {
        self.definitions
            .get(operation_id)
            .ok_or_else(|| ValidationError::UnknownOperationId(operation_id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequestDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<'a> IntoIterator for &'a RequestDefinitions {
    type Item = &'a RequestDefinition;
    type IntoIter = indexmap::map::Values<'a, String, RequestDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.definitions.values()
    }
}
