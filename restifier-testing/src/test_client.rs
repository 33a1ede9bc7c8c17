// Test HTTP client

use restifier_core::{
    Error, HttpMethod, HttpRequest, HttpResponse, Middleware, MiddlewareChain, RequestHandler,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Drives a handler with in-memory requests
#[derive(Clone)]
pub struct TestClient {
    handler: Arc<dyn RequestHandler>,
    middleware: MiddlewareChain,
}

impl TestClient {
    pub fn new<H: RequestHandler + 'static>(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
            middleware: MiddlewareChain::new(),
        }
    }

    /// Run every request through a middleware first
    pub fn with_middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.use_middleware(middleware);
        self
    }

    pub fn get(&self, path: &str) -> TestResponse {
        self.send(TestRequestBuilder::new(HttpMethod::GET, path).build())
    }

    /// POST a JSON body
    pub fn post_json<T: Serialize>(&self, path: &str, body: &T) -> TestResponse {
        let request = TestRequestBuilder::new(HttpMethod::POST, path)
            .json(body)
            .unwrap_or_else(|e| panic!("Failed to serialize request body: {}", e))
            .build();
        self.send(request)
    }

    /// POST raw bytes
    pub fn post(&self, path: &str, body: impl Into<Vec<u8>>) -> TestResponse {
        self.send(TestRequestBuilder::new(HttpMethod::POST, path).body(body).build())
    }

    /// Send a request with any method and optional body
    pub fn request(&self, method: HttpMethod, path: &str, body: Option<Vec<u8>>) -> TestResponse {
        let mut builder = TestRequestBuilder::new(method, path);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        self.send(builder.build())
    }

    /// Send a prepared request; handler errors are rendered as responses
    pub fn send(&self, request: HttpRequest) -> TestResponse {
        TestResponse::new(self.middleware.respond(request, self.handler.as_ref()))
    }
}

/// Builder for test requests
#[derive(Debug, Clone)]
pub struct TestRequestBuilder {
    request: HttpRequest,
}

impl TestRequestBuilder {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            request: HttpRequest::new(method.as_str(), path),
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.request = self.request.with_header(key, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.request = self.request.with_body(body);
        self
    }

    /// Set a JSON body and content type
    pub fn json<T: Serialize>(self, data: &T) -> Result<Self, Error> {
        let body = serde_json::to_vec(data).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(self.header("Content-Type", "application/json").body(body))
    }

    pub fn build(self) -> HttpRequest {
        self.request
    }
}

/// Response from a test request
#[derive(Debug, Clone)]
pub struct TestResponse {
    response: HttpResponse,
}

impl TestResponse {
    pub fn new(response: HttpResponse) -> Self {
        Self { response }
    }

    pub fn status(&self) -> u16 {
        self.response.status
    }

    /// Body decoded as UTF-8
    pub fn text(&self) -> String {
        self.response.body_text()
    }

    /// Body parsed as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.response.body)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Case-insensitive header lookup
    pub fn header(&self, key: &str) -> Option<&str> {
        self.response.header(key)
    }

    /// Panic unless the status matches
    pub fn assert_status(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status(),
            expected,
            "Expected status {}, got {} with body {}",
            expected,
            self.status(),
            self.text()
        );
        self
    }

    pub fn into_inner(self) -> HttpResponse {
        self.response
    }
}
