// Test assertions for responses

use crate::TestResponse;
use restifier_core::HttpStatus;
use serde_json::Value;

/// Assert a specific HTTP status
pub fn assert_http_status(response: &TestResponse, expected: HttpStatus) {
    response.assert_status(expected.code());
}

/// Assert the body is JSON equal to `expected`
pub fn assert_json(response: &TestResponse, expected: &Value) {
    let actual: Value = response
        .json()
        .unwrap_or_else(|e| panic!("Response body is not JSON ({}): {}", e, response.text()));
    assert_eq!(&actual, expected, "JSON bodies do not match");
}

/// Assert one top-level field of a JSON body
pub fn assert_json_field(response: &TestResponse, field: &str, expected: &Value) {
    let actual: Value = response
        .json()
        .unwrap_or_else(|e| panic!("Response body is not JSON ({}): {}", e, response.text()));
    assert_eq!(
        actual.get(field),
        Some(expected),
        "Expected field '{}' to be {}, body was {}",
        field,
        expected,
        actual
    );
}

/// Assert a header value
pub fn assert_header(response: &TestResponse, key: &str, expected: &str) {
    let actual = response.header(key);
    assert_eq!(
        actual,
        Some(expected),
        "Expected header '{}' to be '{}', got {:?}",
        key,
        expected,
        actual
    );
}

/// Assert the body contains a string
pub fn assert_body_contains(response: &TestResponse, expected: &str) {
    let body = response.text();
    assert!(
        body.contains(expected),
        "Expected body to contain '{}', but it didn't. Body: {}",
        expected,
        body
    );
}

/// Assert a 2xx status
pub fn assert_success(response: &TestResponse) {
    let status = response.status();
    assert!(
        (200..300).contains(&status),
        "Expected successful status (2xx), got {}",
        status
    );
}

/// Assert a 4xx status
pub fn assert_client_error(response: &TestResponse) {
    let status = response.status();
    assert!(
        (400..500).contains(&status),
        "Expected client error status (4xx), got {}",
        status
    );
}

/// Assert a 5xx status
pub fn assert_server_error(response: &TestResponse) {
    let status = response.status();
    assert!(
        (500..600).contains(&status),
        "Expected server error status (5xx), got {}",
        status
    );
}
