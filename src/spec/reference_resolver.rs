use crate::error::ValidationError;
use crate::spec::loader::DocumentRetriever;
use percent_encoding::percent_decode_str;
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

/// Eagerly replaces every `{"$ref": "..."}` node with its expanded target.
///
/// Handles local pointers (`#/definitions/Pet`) and references into other
/// documents (`common.yaml#/Error`), each of which is retrieved once. The
/// expansion fails instead of looping when a reference is re-entered while
/// it is still being expanded, or when nesting exceeds `max_depth`.
pub struct ReferenceResolver<'r> {
    retriever: &'r dyn DocumentRetriever,
    max_depth: usize,
    documents: HashMap<Url, Value>,
    expanded: HashMap<String, Value>,
}

impl<'r> ReferenceResolver<'r> {
    pub fn new(retriever: &'r dyn DocumentRetriever, max_depth: usize) -> Self {
        Self {
            retriever,
            max_depth,
            documents: HashMap::new(),
            expanded: HashMap::new(),
        }
    }

    /// Makes an already parsed document available under `url`
    pub fn register(&mut self, url: Url, document: Value) {
        self.documents.insert(url, document);
    }

    /// Returns a fully expanded copy of the document at `url`
    pub fn expand_document(&mut self, url: &Url) -> Result<Value, ValidationError> {
        let mut document = self.document(url)?.clone();
        let mut stack = Vec::new();
        self.expand(&mut document, url, &mut stack)?;
        Ok(document)
    }

    /// Expands references below `node`, resolving relative ones against `base`
    pub fn expand(&mut self, node: &mut Value, base: &Url, stack: &mut Vec<String>) -> Result<(), ValidationError> {
        match node {
            Value::Object(members) => {
                for member in members.values_mut() {
                    self.expand_member(member, base, stack)?;
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    self.expand_member(item, base, stack)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn expand_member(&mut self, member: &mut Value, base: &Url, stack: &mut Vec<String>) -> Result<(), ValidationError> {
        match reference_of(member) {
            Some(reference) => {
                *member = self.resolve(&reference, base, stack)?;
                Ok(())
            }
            None => self.expand(member, base, stack),
        }
    }

    fn resolve(&mut self, reference: &str, base: &Url, stack: &mut Vec<String>) -> Result<Value, ValidationError> {
        let target = base
            .join(reference)
            .map_err(|_| ValidationError::UnresolvableReference(reference.to_string()))?;
        let key = target.to_string();

        if let Some(value) = self.expanded.get(&key) {
            return Ok(value.clone());
        }
        if stack.contains(&key) {
            return Err(ValidationError::CyclicReference(reference.to_string()));
        }
        if stack.len() >= self.max_depth {
            return Err(ValidationError::ReferenceDepthExceeded {
                reference: reference.to_string(),
                max_depth: self.max_depth,
            });
        }

        let mut document_url = target.clone();
        document_url.set_fragment(None);
        let pointer = percent_decode_str(target.fragment().unwrap_or(""))
            .decode_utf8()
            .map_err(|_| ValidationError::UnresolvableReference(reference.to_string()))?
            .into_owned();

        log::trace!("Resolving {} as {}", reference, key);
        let mut value = self
            .document(&document_url)?
            .pointer(&pointer)
            .cloned()
            .ok_or_else(|| ValidationError::UnresolvableReference(reference.to_string()))?;

        stack.push(key.clone());
        let expanded = self.expand_member(&mut value, &document_url, stack);
        stack.pop();
        expanded?;

        self.expanded.insert(key, value.clone());
        Ok(value)
    }

    fn document(&mut self, url: &Url) -> Result<&Value, ValidationError> {
        if !self.documents.contains_key(url) {
            let document = self.retriever.retrieve(url)?;
            self.documents.insert(url.clone(), document);
        }
        self.documents
            .get(url)
            .ok_or_else(|| ValidationError::UnresolvableReference(url.to_string()))
    }
}

/// The target of a `{"$ref": <string>}` node
fn reference_of(node: &Value) -> Option<String> {
    node.as_object()?
        .get("$ref")?
        .as_str()
        .map(str::to_string)
}
