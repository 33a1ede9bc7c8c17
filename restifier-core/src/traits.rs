// Core traits for Restifier

use crate::{Error, HttpRequest, HttpResponse};

/// Trait for request handlers.
///
/// Handling is a single synchronous computation over an already-read request;
/// the surrounding server owns I/O and whatever concurrency model it likes.
pub trait RequestHandler: Send + Sync {
    /// Handle an HTTP request and return a response
    fn handle(&self, request: HttpRequest) -> Result<HttpResponse, Error>;
}

impl<F> RequestHandler for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, Error> + Send + Sync,
{
    fn handle(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        self(request)
    }
}

/// HTTP methods
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
}

impl HttpMethod {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            "PUT" => Some(HttpMethod::PUT),
            "DELETE" => Some(HttpMethod::DELETE),
            "PATCH" => Some(HttpMethod::PATCH),
            "HEAD" => Some(HttpMethod::HEAD),
            "OPTIONS" => Some(HttpMethod::OPTIONS),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_method_round_trips_through_str() {
        for method in [HttpMethod::GET, HttpMethod::POST, HttpMethod::PATCH] {
            assert_eq!(HttpMethod::from_str(method.as_str()), Some(method));
        }
        assert_eq!(HttpMethod::from_str("post"), Some(HttpMethod::POST));
        assert_eq!(HttpMethod::from_str("BREW"), None);
    }

    #[test]
    fn test_closures_are_handlers() {
        let handler = |req: HttpRequest| -> Result<HttpResponse, Error> { Ok(HttpResponse::text(req.path)) };
        let response = handler.handle(HttpRequest::new("GET", "/hello")).unwrap();
        assert_eq!(response.body, b"/hello".to_vec());

        let shared: Arc<dyn RequestHandler> = Arc::new(handler);
        assert_eq!(shared.handle(HttpRequest::new("GET", "/x")).unwrap().status, 200);
    }
}
