use crate::error::ValidationError;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use url::Url;

/// Serialization formats accepted for API documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from the extension of a location, ignoring query and fragment
    pub fn from_location(location: &str) -> Result<Self, ValidationError> {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        match Path::new(path).extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yml") | Some("yaml") => Ok(Self::Yaml),
            _ => Err(ValidationError::UnsupportedFormat(location.to_string())),
        }
    }
}

/// Turns a location (URL or filesystem path) into an absolute URL
pub fn location_to_url(location: &str) -> Result<Url, ValidationError> {
    // Single letter schemes are Windows drive letters, not URLs
    if let Ok(url) = Url::parse(location) {
        if url.scheme().len() > 1 {
            return Ok(url);
        }
    }

    let path = Path::new(location);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| ValidationError::DocumentRetrieval {
                location: location.to_string(),
                message: e.to_string(),
            })?
            .join(path)
    };

    Url::from_file_path(&absolute).map_err(|_| ValidationError::DocumentRetrieval {
        location: location.to_string(),
        message: "not a valid file path".to_string(),
    })
}

/// Parses document text into the generic tree shared by JSON and YAML
pub fn parse_document(contents: &str, format: DocumentFormat, location: &str) -> Result<Value, ValidationError> {
    let parse_error = |message: String| ValidationError::DocumentParse {
        location: location.to_string(),
        message,
    };

    match format {
        DocumentFormat::Json => serde_json::from_str(contents).map_err(|e| parse_error(e.to_string())),
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(contents).map_err(|e| parse_error(e.to_string()))?;
            yaml_to_json(yaml).map_err(parse_error)
        }
    }
}

/// Converts a YAML tree into a JSON tree. Non-string keys (e.g. `200:`) become strings.
pub fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("number {} has no JSON representation", n))?
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect::<Result<_, _>>()?),
        Yaml::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                object.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        other => Err(format!("unsupported mapping key {:?}", other)),
    }
}

/// Source of API documents, addressed by URL
pub trait DocumentRetriever {
    fn retrieve(&self, url: &Url) -> Result<Value, ValidationError>;
}

/// Reads documents from the local filesystem (`file://` URLs)
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRetriever;

impl DocumentRetriever for FileRetriever {
    fn retrieve(&self, url: &Url) -> Result<Value, ValidationError> {
        let retrieval_error = |message: String| ValidationError::DocumentRetrieval {
            location: url.to_string(),
            message,
        };

        if url.scheme() != "file" {
            return Err(retrieval_error(format!("unsupported scheme {}", url.scheme())));
        }
        let format = DocumentFormat::from_location(url.path())?;
        let path = url
            .to_file_path()
            .map_err(|_| retrieval_error("not a local file".to_string()))?;
        let contents = fs::read_to_string(&path).map_err(|e| retrieval_error(e.to_string()))?;

        log::debug!("Loaded document {} ({} bytes)", url, contents.len());
        parse_document(&contents, format, url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(DocumentFormat::from_location("file:///tmp/api.json").unwrap(), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_location("api.yml").unwrap(), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_location("api.yaml#/paths").unwrap(), DocumentFormat::Yaml);
        assert!(matches!(
            DocumentFormat::from_location("petstore.txt"),
            Err(ValidationError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn yaml_and_json_produce_the_same_tree() {
        let yaml = "responses:\n  200:\n    description: ok\n  default:\n    description: error\nflag: true\nratio: 1.5\n";
        let json = r#"{"responses":{"200":{"description":"ok"},"default":{"description":"error"}},"flag":true,"ratio":1.5}"#;

        assert_eq!(
            parse_document(yaml, DocumentFormat::Yaml, "a.yaml").unwrap(),
            parse_document(json, DocumentFormat::Json, "a.json").unwrap()
        );
    }

    #[test]
    fn reports_parse_errors_with_location() {
        let err = parse_document("{", DocumentFormat::Json, "broken.json").unwrap_err();
        assert!(matches!(err, ValidationError::DocumentParse { location, .. } if location == "broken.json"));
    }

    #[test]
    fn relative_paths_become_file_urls() {
        let url = location_to_url("fixtures/api.json").unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with("/fixtures/api.json"));

        let url = location_to_url("file:///srv/api.yaml").unwrap();
        assert_eq!(url.as_str(), "file:///srv/api.yaml");
    }

    #[test]
    fn file_retriever_reads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("doc.json");
        let yaml_path = dir.path().join("doc.yaml");
        fs::write(&json_path, r#"{"swagger": "2.0"}"#).unwrap();
        fs::write(&yaml_path, "swagger: '2.0'\n").unwrap();

        let retriever = FileRetriever;
        for path in [json_path, yaml_path] {
            let url = Url::from_file_path(&path).unwrap();
            assert_eq!(retriever.retrieve(&url).unwrap(), json!({"swagger": "2.0"}));
        }
    }
}
