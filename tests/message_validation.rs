use http::{Request, Response};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::PathBuf;
use swagger_contract_validator::{
    MessageValidator, Schema, SchemaFactory, SwaggerSchemaFactory, ValidationError, ViolationLocation,
};
use url::Url;

fn petstore() -> Schema {
    let _ = env_logger::builder().is_test(true).try_init();
    let location = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/petstore.yaml");
    SwaggerSchemaFactory::new()
        .create_schema(&location.to_string_lossy())
        .expect("petstore.yaml should build")
}

fn minimal_pet_api() -> Schema {
    let document = json!({
        "swagger": "2.0",
        "info": {"title": "Pets", "version": "1"},
        "paths": {
            "/pet/{id}": {
                "get": {
                    "operationId": "getPetById",
                    "parameters": [{"name": "id", "in": "path", "required": true, "type": "integer"}],
                    "responses": {
                        "200": {"description": "pets", "schema": {"type": "array"}}
                    }
                }
            }
        }
    });
    let url = Url::parse("file:///pets.json").unwrap();
    SwaggerSchemaFactory::new().create_schema_from_document(&url, document).unwrap()
}

fn json_response(status: u16, body: &str) -> Response<Vec<u8>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(body.as_bytes().to_vec())
        .unwrap()
}

#[test]
fn validates_responses_against_the_routed_operation() {
    let schema = minimal_pet_api();
    assert_eq!(schema.find_operation_id("GET", "/pet/42").unwrap(), "getPetById");

    let definition = schema.request_definition("getPetById").unwrap();
    let validator = MessageValidator::new();

    let report = validator
        .validate_response(&json_response(200, r#"[{"id": 1}, {"id": 2}]"#), definition)
        .unwrap();
    assert!(!report.has_violations());

    let report = validator
        .validate_response(&json_response(200, r#"{"id": 1}"#), definition)
        .unwrap();
    assert_eq!(report.violations().len(), 1);
    assert_eq!(report.violations()[0].location(), ViolationLocation::Body);
    assert_eq!(report.violations()[0].constraint(), "type");
}

#[test]
fn accepts_a_valid_request_body() {
    let schema = petstore();
    let definition = schema.find_request_definition("POST", "/v2/pet").unwrap();

    let request = Request::post("/v2/pet")
        .header("Content-Type", "application/json; charset=utf-8")
        .header("api_key", "secret")
        .body(r#"{"name": "doggie", "photoUrls": ["https://example.com/dog.png"], "status": "available"}"#)
        .unwrap();

    let report = MessageValidator::new().validate_request(&request, definition).unwrap();
    assert!(!report.has_violations(), "{:?}", report.violations());
}

#[test]
fn reports_body_violations_with_property_paths() {
    let schema = petstore();
    let definition = schema.request_definition("addPet").unwrap();

    let request = Request::post("/v2/pet")
        .header("Content-Type", "application/json")
        .body(r#"{"name": "doggie", "tags": [{"id": "one"}]}"#)
        .unwrap();

    let report = MessageValidator::new().validate_request(&request, definition).unwrap();
    let mut found: Vec<(&str, &str)> = report
        .violations()
        .iter()
        .map(|v| (v.property(), v.constraint()))
        .collect();
    found.sort();

    assert_eq!(found, [("photoUrls", "required"), ("tags[0].id", "type")]);
    assert!(report.violations().iter().all(|v| v.location() == ViolationLocation::Body));
}

#[test]
fn unsupported_content_type_skips_the_body() {
    let schema = petstore();
    let definition = schema.request_definition("addPet").unwrap();

    let request = Request::post("/v2/pet")
        .header("Content-Type", "text/plain")
        .body("not even json")
        .unwrap();

    let report = MessageValidator::new().validate_request(&request, definition).unwrap();
    assert_eq!(report.violations().len(), 1);

    let violation = &report.violations()[0];
    assert_eq!(violation.property(), "Content-Type");
    assert_eq!(violation.constraint(), "enum");
    assert_eq!(violation.location(), ViolationLocation::Header);
    assert_eq!(
        violation.message(),
        "text/plain is not a supported content type, supported: application/json, application/xml"
    );
}

#[test]
fn missing_content_type_is_reported() {
    let schema = petstore();
    let definition = schema.request_definition("addPet").unwrap();

    let request = Request::post("/v2/pet").body(r#"{"name": "doggie"}"#).unwrap();

    let report = MessageValidator::new().validate_request(&request, definition).unwrap();
    assert_eq!(report.violations().len(), 1);
    assert_eq!(report.violations()[0].constraint(), "required");
    assert_eq!(report.violations()[0].message(), "Content-Type should not be empty");
}

#[test]
fn undecodable_bodies_become_a_single_violation() {
    let schema = petstore();
    let definition = schema.request_definition("addPet").unwrap();

    let request = Request::post("/v2/pet")
        .header("Content-Type", "application/json")
        .body("{\"name\": ")
        .unwrap();

    let report = MessageValidator::new().validate_request(&request, definition).unwrap();
    assert_eq!(report.violations().len(), 1);
    assert_eq!(report.violations()[0].constraint(), "decode");
    assert_eq!(report.violations()[0].location(), ViolationLocation::Body);
}

#[test]
fn normalizes_query_parameters_before_validation() {
    let schema = petstore();
    let definition = schema.find_request_definition("GET", "/v2/pet/findByStatus").unwrap();
    let validator = MessageValidator::new();

    let valid = Request::get("/v2/pet/findByStatus?status=available,sold&limit=10")
        .body("")
        .unwrap();
    assert!(!validator.validate_request(&valid, definition).unwrap().has_violations());

    let invalid = Request::get("/v2/pet/findByStatus?status=available,lost&limit=500")
        .body("")
        .unwrap();
    let report = validator.validate_request(&invalid, definition).unwrap();
    let mut found: Vec<(&str, &str)> = report
        .violations()
        .iter()
        .map(|v| (v.property(), v.constraint()))
        .collect();
    found.sort();

    assert_eq!(found, [("limit", "maximum"), ("status[1]", "enum")]);
    assert!(report.violations().iter().all(|v| v.location() == ViolationLocation::Query));
}

#[test]
fn missing_required_query_parameter() {
    let schema = petstore();
    let definition = schema.request_definition("findPetsByStatus").unwrap();

    let request = Request::get("/v2/pet/findByStatus").body("").unwrap();
    let report = MessageValidator::new().validate_request(&request, definition).unwrap();

    assert_eq!(report.violations().len(), 1);
    assert_eq!(report.violations()[0].property(), "status");
    assert_eq!(report.violations()[0].constraint(), "required");
}

#[test]
fn validates_path_variables() {
    let schema = petstore();
    let definition = schema.request_definition("getPetById").unwrap();
    let validator = MessageValidator::new();

    let valid = Request::get("/v2/pet/42").body("").unwrap();
    assert!(!validator.validate_request(&valid, definition).unwrap().has_violations());

    let invalid = Request::get("/v2/pet/rex").body("").unwrap();
    let report = validator.validate_request(&invalid, definition).unwrap();
    assert_eq!(report.violations().len(), 1);
    assert_eq!(report.violations()[0].property(), "petId");
    assert_eq!(report.violations()[0].location(), ViolationLocation::Path);
}

#[test]
fn validates_urlencoded_form_bodies() {
    let schema = petstore();
    let definition = schema.request_definition("updatePetWithForm").unwrap();
    let validator = MessageValidator::new();

    let valid = Request::post("/v2/pet/42")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("name=rex&status=sold")
        .unwrap();
    assert!(!validator.validate_request(&valid, definition).unwrap().has_violations());

    let invalid = Request::post("/v2/pet/42")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("status=lost")
        .unwrap();
    let report = validator.validate_request(&invalid, definition).unwrap();
    let mut found: Vec<(&str, &str)> = report
        .violations()
        .iter()
        .map(|v| (v.property(), v.constraint()))
        .collect();
    found.sort();
    assert_eq!(found, [("name", "required"), ("status", "enum")]);
}

#[test]
fn validates_response_headers() {
    let schema = petstore();
    let definition = schema.request_definition("loginUser").unwrap();
    let validator = MessageValidator::new();

    let response = Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("x-rate-limit", "100")
        .header("X-Expires-After", "2026-10-18T10:00:00Z")
        .body(r#""token""#)
        .unwrap();
    assert!(!validator.validate_response(&response, definition).unwrap().has_violations());

    let response = Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("X-Rate-Limit", "many")
        .body(r#""token""#)
        .unwrap();
    let report = validator.validate_response(&response, definition).unwrap();
    let mut found: Vec<(&str, &str)> = report
        .violations()
        .iter()
        .map(|v| (v.property(), v.constraint()))
        .collect();
    found.sort();

    assert_eq!(found, [("X-Expires-After", "required"), ("X-Rate-Limit", "type")]);
    assert!(report.violations().iter().all(|v| v.location() == ViolationLocation::Header));
}

#[test]
fn falls_back_to_the_default_response() {
    let schema = petstore();
    let definition = schema.request_definition("getInventory").unwrap();
    let validator = MessageValidator::new();

    let error = json_response(503, r#"{"code": 503, "message": "maintenance"}"#);
    assert!(!validator.validate_response(&error, definition).unwrap().has_violations());

    let wrong = json_response(500, r#"{"code": "boom"}"#);
    let report = validator.validate_response(&wrong, definition).unwrap();
    assert_eq!(report.violations().len(), 1);
    assert_eq!(report.violations()[0].property(), "code");
}

#[test]
fn undeclared_status_without_default_is_an_error() {
    let schema = petstore();
    let definition = schema.request_definition("getPetById").unwrap();

    let err = MessageValidator::new()
        .validate_response(&json_response(500, "{}"), definition)
        .unwrap_err();

    assert!(matches!(err, ValidationError::NoResponseDefinitionForStatus { status: 500, .. }));
    assert_eq!(
        err.to_string(),
        "No response definition for GET /v2/pet/{petId} is available for status code 500"
    );
}

#[test]
fn bodies_are_decoded_with_the_declared_content_type() {
    let schema = petstore();
    let definition = schema.request_definition("addPet").unwrap();

    let response = Response::builder()
        .status(201)
        .header("Content-Type", "application/json")
        .body("name: doggie\nphotoUrls: []\n")
        .unwrap();
    let report = MessageValidator::new().validate_response(&response, definition).unwrap();

    assert_eq!(report.violations().len(), 1);
    assert_eq!(report.violations()[0].constraint(), "decode");
}

#[test]
fn response_without_content_type_is_read_as_json() {
    let schema = minimal_pet_api();
    let definition = schema.request_definition("getPetById").unwrap();
    let validator = MessageValidator::new();

    let response = Response::builder().status(200).body("[1, 2]").unwrap();
    assert!(!validator.validate_response(&response, definition).unwrap().has_violations());

    let response = Response::builder().status(200).body(r#"{"id": 1}"#).unwrap();
    let report = validator.validate_response(&response, definition).unwrap();
    assert_eq!(report.violations().len(), 1);
    assert_eq!(report.violations()[0].constraint(), "type");
}

#[test]
fn content_type_parameters_do_not_change_the_body_format() {
    let schema = petstore();
    let definition = schema.request_definition("findPetsByStatus").unwrap();

    let response = Response::builder()
        .status(200)
        .header("Content-Type", r#"application/json; profile="https://example.com/pet""#)
        .body(r#"[{"name": "doggie", "photoUrls": []}]"#)
        .unwrap();

    let report = MessageValidator::new().validate_response(&response, definition).unwrap();
    assert!(!report.has_violations(), "{:?}", report.violations());
}

#[test]
fn compiled_schemas_are_reused_across_messages() {
    let schema = petstore();
    let definition = schema.request_definition("getPetById").unwrap();
    let validator = MessageValidator::new();

    for id in ["1", "2", "rex"] {
        let request = Request::get(format!("/v2/pet/{}", id)).body("").unwrap();
        validator.validate_request(&request, definition).unwrap();
    }

    assert_eq!(validator.compiled_schemas(), 1);
}
