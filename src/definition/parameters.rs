use crate::definition::parameter::{Location, Parameter};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Parameters of an operation or response, keyed by name in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    parameters: IndexMap<String, Parameter>,
}

impl Parameters {
    pub fn new(parameters: impl IntoIterator<Item = Parameter>) -> Self {
        let mut set = Self::default();
        for parameter in parameters {
            set.add(parameter);
        }
        set
    }

    /// Later parameters replace earlier ones with the same name
    fn add(&mut self, parameter: Parameter) {
        self.parameters.insert(parameter.name().to_string(), parameter);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.values()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn by_location(&self, location: Location) -> Vec<&Parameter> {
        self.iter().filter(|p| p.location() == location).collect()
    }

    pub fn path(&self) -> Vec<&Parameter> {
        self.by_location(Location::Path)
    }

    pub fn query(&self) -> Vec<&Parameter> {
        self.by_location(Location::Query)
    }

    pub fn headers(&self) -> Vec<&Parameter> {
        self.by_location(Location::Header)
    }

    pub fn form_data(&self) -> Vec<&Parameter> {
        self.by_location(Location::FormData)
    }

    pub fn body(&self) -> Option<&Parameter> {
        self.iter().find(|p| p.location() == Location::Body)
    }

    pub fn has_body_schema(&self) -> bool {
        self.body_schema().is_some()
    }

    pub fn body_schema(&self) -> Option<&Value> {
        self.body().and_then(Parameter::schema)
    }

    pub fn path_schema(&self) -> Option<Value> {
        synthesize_object_schema(&self.path())
    }

    pub fn query_schema(&self) -> Option<Value> {
        synthesize_object_schema(&self.query())
    }

    pub fn headers_schema(&self) -> Option<Value> {
        synthesize_object_schema(&self.headers())
    }

    pub fn form_data_schema(&self) -> Option<Value> {
        synthesize_object_schema(&self.form_data())
    }
}

/// `{type: object, required: [...], properties: {...}}` over the given parameters
fn synthesize_object_schema(parameters: &[&Parameter]) -> Option<Value> {
    if parameters.is_empty() {
        return None;
    }

    let required: Vec<Value> = parameters
        .iter()
        .filter(|p| p.is_required())
        .map(|p| Value::String(p.name().to_string()))
        .collect();

    let properties: Map<String, Value> = parameters
        .iter()
        .map(|p| {
            let schema = p.schema().cloned().unwrap_or_else(|| json!({}));
            (p.name().to_string(), schema)
        })
        .collect();

    Some(json!({
        "type": "object",
        "required": required,
        "properties": properties,
    }))
}
