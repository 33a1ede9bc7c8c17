//! Integration tests for restifier-docs

use restifier_core::{HttpMethod, HttpRequest, RequestHandler};
use restifier_docs::*;
use restifier_validation::{
    ApiRoute, MessageSchema, Property, RouteTable, api, bounds, regex, required,
};
use serde_json::{Value, json};

fn routes() -> RouteTable {
    let education = MessageSchema::builder("EducationMessage")
        .property(Property::string("school").description("The name of the school."))
        .property(
            Property::string("degree")
                .validator(regex("(MS|PHD|BS)").unwrap())
                .description("Highest degree achieved."),
        )
        .build()
        .unwrap();
    let profile = MessageSchema::builder("ProfileMessage")
        .property(Property::string("name").validator(required()).description("The name"))
        .property(Property::integer("age").validator(bounds(Some(0.0), None)))
        .property(Property::structured("education", education).repeated())
        .build()
        .unwrap();
    let saved = MessageSchema::builder("SavedMessage")
        .property(Property::string("name"))
        .build()
        .unwrap();

    RouteTable::new(vec![
        ApiRoute::api(
            HttpMethod::POST,
            "/profiles",
            api(profile.clone(), saved, |m| Ok(json!({"name": m.get("name").and_then(|v| v.as_str())}).into())),
        )
        .describe("Create a profile"),
        ApiRoute::api(
            HttpMethod::PUT,
            "/profiles/current",
            api(profile.clone(), profile, |m| Ok(m.into())),
        ),
    ])
}

fn app() -> Documented<RouteTable> {
    let config = DocsConfig::new("/docs")
        .with_overview("Profile service")
        .with_title("Profiles <API>");
    DocsMiddleware::new(config, &routes()).wrap(routes())
}

#[test]
fn test_artifact_lists_every_bound_route() {
    let doc = DocsBuilder::new("/docs").routes(&routes()).build();

    let methods: Vec<&str> = doc.routes.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(methods, vec!["POST", "PUT"]);

    let create = doc.route("POST", "/profiles").unwrap();
    assert_eq!(create.input_fields.len(), 3);
    assert_eq!(create.output_fields.len(), 1);

    let education = &create.input_fields[2];
    assert_eq!(education.kind, "structured");
    assert!(education.repeated);
    assert_eq!(education.fields[1].name, "degree");
}

#[test]
fn test_json_artifact_shape() {
    let request = HttpRequest::new("GET", "/docs").with_header("Accept", "application/json");
    let response = app().handle(request).unwrap();
    assert_eq!(response.status, 200);

    let body: Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body["api_base"], "/docs");
    assert_eq!(body["api_overview"], "Profile service");
    assert_eq!(
        body["routes"][0]["input_fields"][0],
        json!({
            "name": "name",
            "kind": "string",
            "repeated": false,
            "required": true,
            "description": "The name"
        })
    );
}

#[test]
fn test_yaml_artifact() {
    let request = HttpRequest::new("GET", "/docs/").with_header("Accept", "application/x-yaml");
    let response = app().handle(request).unwrap();
    let doc: ApiDocumentation = serde_yaml::from_slice(&response.body).unwrap();
    assert_eq!(doc.routes.len(), 2);
}

#[test]
fn test_html_page() {
    let response = app().handle(HttpRequest::new("GET", "/docs")).unwrap();
    let html = response.body_text();

    assert!(html.contains("<title>Profiles &lt;API&gt;</title>"));
    assert!(html.contains("Profile service"));
    assert!(html.contains("/profiles/current"));
    assert!(html.contains("Highest degree achieved."));
}

#[test]
fn test_other_paths_are_forwarded() {
    let app = app();

    let response = app
        .handle(HttpRequest::new("POST", "/profiles").with_body(r#"{"name": "Ada"}"#))
        .unwrap();
    assert_eq!(response.body_text(), r#"{"name":"Ada"}"#);

    let response = app.handle(HttpRequest::new("POST", "/profiles").with_body("{}")).unwrap();
    assert_eq!(response.status, 400);

    let err = app.handle(HttpRequest::new("GET", "/docs/extra")).unwrap_err();
    assert_eq!(err.status_code(), 404);
}
