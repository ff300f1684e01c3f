use crate::config::MessageValidatorConfig;
use crate::decoder::{BodyDecoder, DefaultBodyDecoder};
use crate::definition::RequestDefinition;
use crate::error::ValidationError;
use crate::schema::HttpMethod;
use crate::validation_helpers::ValidatorCache;
use crate::validators::parameter::{validate_headers, validate_path, validate_query};
use crate::validators::request::{validate_body, validate_content_type, validate_form_body};
use crate::violation::ValidationReport;
use http::{Request, Response};

/// Validates HTTP messages against request definitions.
///
/// Every call returns its own [`ValidationReport`]; the validator keeps no
/// per-message state and can be shared between threads. Compiled schemas
/// are kept for the lifetime of the validator.
pub struct MessageValidator<D = DefaultBodyDecoder> {
    decoder: D,
    config: MessageValidatorConfig,
    validators: ValidatorCache,
}

impl MessageValidator<DefaultBodyDecoder> {
    pub fn new() -> Self {
        Self::with_decoder(DefaultBodyDecoder, MessageValidatorConfig::default())
    }
}

impl Default for MessageValidator<DefaultBodyDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: BodyDecoder> MessageValidator<D> {
    pub fn with_decoder(decoder: D, config: MessageValidatorConfig) -> Self {
        Self {
            decoder,
            config,
            validators: ValidatorCache::new(),
        }
    }

    /// Number of distinct schemas compiled so far
    pub fn compiled_schemas(&self) -> usize {
        self.validators.len()
    }

    /// Validates body, headers, path and query of a request
    pub fn validate_request<B: AsRef<[u8]>>(
        &self,
        request: &Request<B>,
        definition: &RequestDefinition,
    ) -> Result<ValidationReport, ValidationError> {
        let headers = request.headers();
        let body = request.body().as_ref();
        let carries_body = HttpMethod::try_from(request.method())
            .map(|method| self.config.body_methods.contains(&method))
            .unwrap_or(false);

        let mut violations = Vec::new();

        if let Some(body_schema) = definition.body_schema() {
            match validate_content_type(headers, definition.content_types()) {
                Some(violation) => violations.push(violation),
                None if carries_body => {
                    violations.extend(validate_body(&self.validators, &self.decoder, headers, body, body_schema)?)
                }
                None => {}
            }
        } else if let Some(form_schema) = definition.form_data_schema() {
            match validate_content_type(headers, definition.content_types()) {
                Some(violation) => violations.push(violation),
                None if carries_body => violations.extend(validate_form_body(&self.validators, headers, body, &form_schema)?),
                None => {}
            }
        }

        violations.extend(validate_headers(&self.validators, headers, definition.headers_schema())?);
        violations.extend(validate_path(
            &self.validators,
            request.uri().path(),
            definition.path_template(),
            definition.path_schema(),
        )?);
        violations.extend(validate_query(
            &self.validators,
            request.uri().query(),
            definition.query_schema(),
        )?);

        log::debug!(
            "Validated {} {} against {}: {} violation(s)",
            request.method(),
            request.uri(),
            definition.operation_id(),
            violations.len()
        );
        Ok(ValidationReport::new(violations))
    }

    /// Validates body and headers of a response to the operation
    pub fn validate_response<B: AsRef<[u8]>>(
        &self,
        response: &Response<B>,
        definition: &RequestDefinition,
    ) -> Result<ValidationReport, ValidationError> {
        let status = response.status().as_u16();
        let response_definition = definition.response_definition(status)?;
        let headers = response.headers();

        let mut violations = Vec::new();

        if let Some(body_schema) = response_definition.body_schema() {
            match validate_content_type(headers, response_definition.content_types()) {
                Some(violation) => violations.push(violation),
                None => violations.extend(validate_body(
                    &self.validators,
                    &self.decoder,
                    headers,
                    response.body().as_ref(),
                    body_schema,
                )?),
            }
        }

        violations.extend(validate_headers(
            &self.validators,
            headers,
            response_definition.headers_schema(),
        )?);

        log::debug!(
            "Validated {} response of {}: {} violation(s)",
            status,
            definition.operation_id(),
            violations.len()
        );
        Ok(ValidationReport::new(violations))
    }
}
