use crate::error::ValidationError;
use crate::spec::loader::yaml_to_json;
use serde_json::Value;

/// Extracts the decoder format from a MIME type.
///
/// `application/hal+json; charset=utf-8` gives `hal+json`.
pub fn extract_format_from_content_type(content_type: &str) -> String {
    let media_type = content_type.split(';').next().unwrap_or(content_type);
    let subtype = media_type.split_once('/').map_or(media_type, |(_, subtype)| subtype);
    subtype.trim().to_string()
}

/// Turns raw body bytes of a given format into a JSON tree
pub trait BodyDecoder {
    fn decode(&self, body: &[u8], format: &str) -> Result<Value, ValidationError>;
}

/// Decodes JSON (including `+json` types such as `problem+json`) and YAML bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBodyDecoder;

impl BodyDecoder for DefaultBodyDecoder {
    fn decode(&self, body: &[u8], format: &str) -> Result<Value, ValidationError> {
        let malformed = |message: String| ValidationError::MalformedBody {
            format: format.to_string(),
            message,
        };

        if format == "json" || format.ends_with("+json") {
            serde_json::from_slice(body).map_err(|e| malformed(e.to_string()))
        } else if matches!(format, "yaml" | "x-yaml") || format.ends_with("+yaml") {
            let yaml: serde_yaml::Value = serde_yaml::from_slice(body).map_err(|e| malformed(e.to_string()))?;
            yaml_to_json(yaml).map_err(malformed)
        } else {
            Err(ValidationError::UnsupportedBodyFormat(format.to_string()))
        }
    }
}
