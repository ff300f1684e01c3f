use crate::config::SchemaFactoryConfig;
use crate::definition::{
    Location, Parameter, Parameters, RequestDefinition, RequestDefinitions, ResponseDefinition, StatusKey,
};
use crate::error::ValidationError;
use crate::schema::{HttpMethod, Schema};
use crate::spec::loader::{location_to_url, DocumentFormat, DocumentRetriever, FileRetriever};
use crate::spec::reference_resolver::ReferenceResolver;
use crate::uri_template;
use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use std::str::FromStr;
use url::Url;

/// Builds a [`Schema`] from the document found at a location
pub trait SchemaFactory {
    fn create_schema(&self, location: &str) -> Result<Schema, ValidationError>;
}

/// Schema factory for Swagger 2 documents in JSON or YAML
pub struct SwaggerSchemaFactory<R = FileRetriever> {
    retriever: R,
    config: SchemaFactoryConfig,
}

impl SwaggerSchemaFactory<FileRetriever> {
    pub fn new() -> Self {
        Self::with_retriever(FileRetriever, SchemaFactoryConfig::default())
    }
}

impl Default for SwaggerSchemaFactory<FileRetriever> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: DocumentRetriever> SwaggerSchemaFactory<R> {
    pub fn with_retriever(retriever: R, config: SchemaFactoryConfig) -> Self {
        Self { retriever, config }
    }

    pub fn config(&self) -> &SchemaFactoryConfig {
        &self.config
    }

    /// Builds a schema from an already parsed document that lives at `url`.
    ///
    /// Relative references inside the document resolve against `url`.
    pub fn create_schema_from_document(&self, url: &Url, document: Value) -> Result<Schema, ValidationError> {
        let mut resolver = ReferenceResolver::new(&self.retriever, self.config.max_reference_depth);
        resolver.register(url.clone(), document);
        let document = resolver.expand_document(url)?;
        self.build_schema(&document)
    }

    fn build_schema(&self, document: &Value) -> Result<Schema, ValidationError> {
        let schemes = document
            .get("schemes")
            .map(string_list)
            .unwrap_or_else(|| self.config.default_schemes.clone());

        Ok(Schema::new(
            create_request_definitions(document)?,
            document.get("basePath").and_then(Value::as_str).unwrap_or(""),
            document.get("host").and_then(Value::as_str).unwrap_or(""),
            schemes,
        ))
    }
}

impl<R: DocumentRetriever> SchemaFactory for SwaggerSchemaFactory<R> {
    fn create_schema(&self, location: &str) -> Result<Schema, ValidationError> {
        DocumentFormat::from_location(location)?;
        let url = location_to_url(location)?;
        log::debug!("Building schema from {}", url);

        let mut resolver = ReferenceResolver::new(&self.retriever, self.config.max_reference_depth);
        let document = resolver.expand_document(&url)?;
        let schema = self.build_schema(&document)?;

        log::debug!(
            "Built schema from {} with {} operations",
            url,
            schema.request_definitions().len()
        );
        Ok(schema)
    }
}

/// Builds one request definition per (path, method) of an expanded document
fn create_request_definitions(document: &Value) -> Result<RequestDefinitions, ValidationError> {
    let default_consumes = document.get("consumes").map(string_list).unwrap_or_default();
    let default_produces = document.get("produces").map(string_list).unwrap_or_default();
    let base_path = document.get("basePath").and_then(Value::as_str).unwrap_or("");

    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        log::warn!("Document has no paths, the schema will not contain any operation");
        return Ok(RequestDefinitions::default());
    };

    let mut definitions: IndexMap<String, RequestDefinition> = IndexMap::new();

    for (path_template, path_item) in paths {
        if path_template.starts_with("x-") {
            continue;
        }
        let Some(path_item) = path_item.as_object() else {
            log::warn!("Skipping path {}: path item is not an object", path_template);
            continue;
        };
        let shared_parameters = path_item
            .get("parameters")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for (key, operation) in path_item {
            if key == "parameters" || key.starts_with("x-") {
                continue;
            }
            let Ok(method) = HttpMethod::from_str(key) else {
                log::warn!("Skipping unknown key {} in path {}", key, path_template);
                continue;
            };
            let label = format!("{} {}", method.as_str(), path_template);

            let operation_id = operation
                .get("operationId")
                .and_then(Value::as_str)
                .ok_or_else(|| ValidationError::MissingOperationId(label.clone()))?;

            let parameter_nodes = merge_parameters(shared_parameters, operation.get("parameters"));

            let mut content_types = operation
                .get("consumes")
                .map(string_list)
                .unwrap_or_else(|| default_consumes.clone());
            if content_types.is_empty() && contains_body_locations(&parameter_nodes) {
                content_types = guess_content_types(&parameter_nodes, path_template)?;
            }

            let responses = operation
                .get("responses")
                .and_then(Value::as_object)
                .ok_or_else(|| ValidationError::MissingResponses(label.clone()))?;

            let parameters = parameter_nodes
                .iter()
                .map(create_parameter)
                .collect::<Result<Vec<_>, _>>()?;

            let response_content_types = operation
                .get("produces")
                .map(string_list)
                .unwrap_or_else(|| default_produces.clone());

            let response_definitions = responses
                .iter()
                .filter(|(status, _)| !status.starts_with("x-"))
                .map(|(status, response)| {
                    create_response_definition(status, &response_content_types, response, &label)
                })
                .collect::<Result<Vec<_>, _>>()?;

            let full_template = if base_path == "/" {
                path_template.clone()
            } else {
                format!("{}{}", base_path, path_template)
            };

            if let Err(e) = uri_template::check(&full_template) {
                log::warn!(
                    "Path template {} of {} will never match a request: {}",
                    full_template,
                    operation_id,
                    e
                );
            }

            if let Some(existing) = definitions.get(operation_id) {
                return Err(ValidationError::DuplicateOperationId {
                    operation_id: operation_id.to_string(),
                    first: format!("{} {}", existing.method().as_str(), existing.path_template()),
                    second: label,
                });
            }

            log::debug!("Built request definition {} for {}", operation_id, label);
            definitions.insert(
                operation_id.to_string(),
                RequestDefinition::new(
                    method,
                    operation_id,
                    full_template,
                    Parameters::new(parameters),
                    content_types,
                    response_definitions,
                ),
            );
        }
    }

    Ok(RequestDefinitions::new(definitions.into_values()))
}

/// Path-level parameters overridden by operation parameters with the same `in` and `name`
fn merge_parameters(shared: &[Value], own: Option<&Value>) -> Vec<Value> {
    let identity = |node: &Value| {
        (
            node.get("in").and_then(Value::as_str).map(str::to_string),
            node.get("name").and_then(Value::as_str).map(str::to_string),
        )
    };

    let mut merged: Vec<Value> = shared.to_vec();
    for node in own.and_then(Value::as_array).into_iter().flatten() {
        match merged.iter().position(|existing| identity(existing) == identity(node)) {
            Some(index) => merged[index] = node.clone(),
            None => merged.push(node.clone()),
        }
    }
    merged
}

fn body_location_of(node: &Value) -> Option<Location> {
    node.get("in")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse::<Location>().ok())
        .filter(Location::is_body)
}

fn contains_body_locations(parameter_nodes: &[Value]) -> bool {
    parameter_nodes.iter().any(|node| body_location_of(node).is_some())
}

/// Infers request content types from the body locations used by the parameters
fn guess_content_types(parameter_nodes: &[Value], path_template: &str) -> Result<Vec<String>, ValidationError> {
    let mut locations: Vec<Location> = Vec::new();
    for location in parameter_nodes.iter().filter_map(body_location_of) {
        if !locations.contains(&location) {
            locations.push(location);
        }
    }

    match locations.as_slice() {
        [] => Ok(Vec::new()),
        [single] => Ok(single.default_content_type().map(str::to_string).into_iter().collect()),
        _ => Err(ValidationError::ConflictingBodyLocations {
            locations: locations
                .iter()
                .map(Location::as_str)
                .collect::<Vec<_>>()
                .join(" and "),
            path: path_template.to_string(),
        }),
    }
}

/// Converts a parameter node; keys other than in/name/required/schema are schema keywords
fn create_parameter(node: &Value) -> Result<Parameter, ValidationError> {
    let fields = node
        .as_object()
        .ok_or_else(|| ValidationError::MalformedParameter(format!("expected an object, got {}", node)))?;

    let mut location = None;
    let mut name = None;
    let mut required = false;
    let mut schema = Map::new();
    let mut inline = Map::new();

    for (key, value) in fields {
        match key.as_str() {
            "in" => location = value.as_str(),
            "name" => name = value.as_str(),
            "required" => required = value.as_bool().unwrap_or(false),
            "schema" => {
                if let Value::Object(declared) = value {
                    schema = declared.clone();
                }
            }
            _ => {
                inline.insert(key.clone(), value.clone());
            }
        }
    }

    let location: Location = location.unwrap_or_default().parse()?;
    let name = name.ok_or_else(|| {
        ValidationError::MalformedParameter(format!("{} parameter without a name", location))
    })?;
    schema.extend(inline);

    // File uploads are not validated
    let is_file = ["format", "type"]
        .iter()
        .any(|keyword| schema.get(*keyword).and_then(Value::as_str) == Some("file"));

    Ok(Parameter::new(
        location,
        name,
        required,
        (!is_file).then_some(Value::Object(schema)),
    ))
}

fn create_response_definition(
    status: &str,
    content_types: &[String],
    response: &Value,
    operation: &str,
) -> Result<ResponseDefinition, ValidationError> {
    let status_code = StatusKey::from_str(status).map_err(|_| ValidationError::InvalidStatusCode {
        status: status.to_string(),
        operation: operation.to_string(),
    })?;

    let mut parameters = Vec::new();
    if let Some(schema) = response.get("schema") {
        parameters.push(create_parameter(&json!({
            "in": "body",
            "name": "body",
            "required": true,
            "schema": schema,
        }))?);
    }

    if let Some(headers) = response.get("headers").and_then(Value::as_object) {
        for (header_name, header) in headers {
            let mut node = header.as_object().cloned().unwrap_or_default();
            node.insert("in".to_string(), json!("header"));
            node.insert("name".to_string(), json!(header_name));
            node.insert("required".to_string(), json!(true));
            parameters.push(create_parameter(&Value::Object(node))?);
        }
    }

    Ok(ResponseDefinition::new(
        status_code,
        content_types.to_vec(),
        Parameters::new(parameters),
    ))
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}
