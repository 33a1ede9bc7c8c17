//! Integration tests for common Restifier workflows.
//!
//! Each test wires schemas, bound handlers, the route table and the
//! documentation middleware together the way a service would.

use restifier::docs::{DocsConfig, DocsMiddleware};
use restifier::prelude::*;
use restifier::validation::{BoundsValidator, RegexValidator, RequiredValidator};
use restifier_testing::{TestClient, assert_body_contains, assert_header, assert_json};
use serde_json::{Value, json};
use std::sync::Arc;

// =============================================================================
// Fixtures
// =============================================================================

fn greeting_input() -> Arc<MessageSchema> {
    MessageSchema::builder("GreetingInput")
        .property(
            Property::string("greeting")
                .validator(required())
                .validate_with(RegexValidator::new("^[A-Za-z]+$").unwrap())
                .description("Letters only"),
        )
        .build()
        .unwrap()
}

fn greeting_output() -> Arc<MessageSchema> {
    MessageSchema::builder("GreetingOutput")
        .property(Property::string("reply").validator(required()))
        .property(Property::datetime("answered_at"))
        .build()
        .unwrap()
}

fn education_schema() -> Arc<MessageSchema> {
    MessageSchema::builder("EducationMessage")
        .property(Property::string("school").description("The name of the school."))
        .property(
            Property::string("degree")
                .validate_with(RegexValidator::new("(MS|PHD|BS)").unwrap())
                .description("Highest degree achieved."),
        )
        .build()
        .unwrap()
}

fn profile_schema() -> Arc<MessageSchema> {
    MessageSchema::builder("ProfileMessage")
        .property(Property::string("name").validator(required()).description("The name"))
        .property(
            Property::integer("age")
                .validate_with(BoundsValidator::new().min(10))
                .description("The age"),
        )
        .property(
            Property::structured("education", education_schema())
                .repeated()
                .validate_with(RequiredValidator::new().max_count(3)),
        )
        .property(Property::date("final_year"))
        .property(Property::datetime("created_at"))
        .build()
        .unwrap()
}

fn routes() -> RouteTable {
    RouteTable::new(vec![
        ApiRoute::api(
            HttpMethod::POST,
            "/greet",
            api(greeting_input(), greeting_output(), |message| {
                let greeting = message.get("greeting").and_then(|v| v.as_str()).unwrap_or("");
                Ok(json!({
                    "reply": format!("{}, yourself", greeting),
                    "answered_at": 1406650720
                })
                .into())
            }),
        )
        .describe("Answer a greeting"),
        ApiRoute::api(
            HttpMethod::PUT,
            "/profile",
            api(profile_schema(), profile_schema(), |message| Ok(message.into())),
        ),
        ApiRoute::api(
            HttpMethod::POST,
            "/fail",
            api(greeting_input(), greeting_output(), |_| {
                Err(Error::Internal("storage offline".to_string()))
            }),
        ),
    ])
}

fn client() -> TestClient {
    let docs = DocsMiddleware::new(
        DocsConfig::new("/api").with_overview("Greeting and profile endpoints"),
        &routes(),
    );
    TestClient::new(routes()).with_middleware(docs)
}

// =============================================================================
// Binding pipeline
// =============================================================================

#[test]
fn test_missing_required_field_is_rejected() {
    let response = client().post_json("/greet", &json!({}));
    response.assert_status(400);
    assert_json(&response, &json!({"greeting": "value is required"}));
}

#[test]
fn test_valid_greeting_is_answered() {
    let response = client().post_json("/greet", &json!({"greeting": "Hi"}));
    response.assert_status(200);
    assert_header(&response, "Content-Type", "application/json");
    assert_json(
        &response,
        &json!({"reply": "Hi, yourself", "answered_at": "2014-07-29T16:18:40Z"}),
    );
}

#[test]
fn test_pattern_violation_is_rejected() {
    let response = client().post_json("/greet", &json!({"greeting": "Hi123123"}));
    response.assert_status(400);
    let body: Value = response.json().unwrap();
    assert!(body["greeting"].as_str().unwrap().contains("does not match"));
}

#[test]
fn test_malformed_body_is_rejected() {
    let response = client().post("/greet", "{greeting: Hi}");
    response.assert_status(400);
    let body: Value = response.json().unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid payload"));
}

#[test]
fn test_handler_failure_hides_detail() {
    let response = client().post_json("/fail", &json!({"greeting": "Hi"}));
    response.assert_status(500);
    assert!(!response.text().contains("storage offline"));
}

#[test]
fn test_non_json_body_is_unsupported() {
    let request = HttpRequest::new("POST", "/greet")
        .with_header("Content-Type", "application/xml")
        .with_body("<greeting>Hi</greeting>");
    let response = client().send(request);
    response.assert_status(415);
    assert_body_contains(&response, "application/xml");
}

#[test]
fn test_unknown_route_and_method() {
    client().get("/nowhere").assert_status(404);
    client().get("/greet").assert_status(405);
}

// =============================================================================
// Message engine through the pipeline
// =============================================================================

#[test]
fn test_profile_round_trip() {
    let payload = json!({
        "name": "Blah",
        "age": "123",
        "education": [
            {"school": "Yale", "degree": "MS"},
            {"school": "NCSU", "degree": "BS"}
        ],
        "final_year": "2012-12-01",
        "created_at": "2014-07-29 16:18:40",
        "ignored": true
    });

    let response = client().request(
        HttpMethod::PUT,
        "/profile",
        Some(payload.to_string().into_bytes()),
    );
    response.assert_status(200);

    let first: Value = response.json().unwrap();
    assert_eq!(first["age"], 123);
    assert_eq!(first["created_at"], "2014-07-29T16:18:40Z");
    assert_eq!(first["education"][1]["school"], "NCSU");
    assert!(first.get("ignored").is_none());

    let again = client().request(HttpMethod::PUT, "/profile", Some(first.to_string().into_bytes()));
    again.assert_status(200);
    assert_eq!(again.json::<Value>().unwrap(), first);
}

#[test]
fn test_profile_errors_name_every_field() {
    let payload = json!({
        "age": 3,
        "education": [
            {"school": "Yale", "degree": "MS"},
            {"school": "NCSU", "degree": "none"}
        ],
        "final_year": "12/01/2012"
    });

    let response = client().request(HttpMethod::PUT, "/profile", Some(payload.to_string().into_bytes()));
    response.assert_status(400);

    let body: Value = response.json().unwrap();
    let mut keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["age", "education[1].degree", "final_year", "name"]);
}

#[test]
fn test_too_many_repeated_items() {
    let education: Vec<Value> = (0..4).map(|_| json!({"degree": "BS"})).collect();
    let payload = json!({"name": "x", "education": education});

    let response = client().request(HttpMethod::PUT, "/profile", Some(payload.to_string().into_bytes()));
    response.assert_status(400);
    assert_json(&response, &json!({"education": "expected at most 3 items, got 4"}));
}

// =============================================================================
// Documentation
// =============================================================================

#[test]
fn test_docs_page_lists_routes() {
    let response = client().get("/api");
    response.assert_status(200);
    assert_body_contains(&response, "Greeting and profile endpoints");
    assert_body_contains(&response, "/greet");
    assert_body_contains(&response, "Letters only");
    assert_body_contains(&response, "Highest degree achieved.");
}

#[test]
fn test_docs_json_artifact() {
    let request = HttpRequest::new("GET", "/api/").with_header("Accept", "application/json");
    let response = client().send(request);
    response.assert_status(200);

    let body: Value = response.json().unwrap();
    assert_eq!(body["api_base"], "/api");
    assert_eq!(body["routes"].as_array().unwrap().len(), 3);
    assert_eq!(body["routes"][0]["method"], "POST");
    assert_eq!(body["routes"][0]["input_fields"][0]["required"], true);
    assert_eq!(body["routes"][1]["input_fields"][2]["fields"][1]["name"], "degree");
}

#[test]
fn test_docs_yaml_by_query() {
    let response = client().get("/api?format=yaml");
    response.assert_status(200);
    assert_header(&response, "Content-Type", "application/x-yaml");
    assert_body_contains(&response, "api_base: /api");
}
