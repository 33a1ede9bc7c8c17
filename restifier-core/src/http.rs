// HTTP request and response types

use serde::Serialize;
use std::collections::HashMap;

/// HTTP request wrapper
///
/// The body holds bytes already read by the surrounding server; nothing in
/// Restifier performs socket I/O.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub query_params: HashMap<String, String>,
}

impl HttpRequest {
    /// Create a request; a query string on `path` is split off into `query_params`.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        let (path, query_params) = match path.split_once('?') {
            Some((p, q)) => (p.to_string(), parse_query_string(q)),
            None => (path, HashMap::new()),
        };

        Self {
            method: method.into().to_uppercase(),
            path,
            headers: HashMap::new(),
            body: Vec::new(),
            query_params,
        }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Get a query parameter by name
    pub fn query(&self, name: &str) -> Option<&String> {
        self.query_params.get(name)
    }

    /// Whether the `Accept` header lists the given media type
    pub fn accepts(&self, media_type: &str) -> bool {
        self.header("Accept").is_some_and(|accept| {
            accept
                .split(',')
                .map(|part| part.split(';').next().unwrap_or("").trim())
                .any(|candidate| candidate.eq_ignore_ascii_case(media_type))
        })
    }
}

/// HTTP response wrapper
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn bad_request() -> Self {
        Self::new(400)
    }

    /// 200 response with an HTML body
    pub fn html(body: impl Into<String>) -> Self {
        Self::ok()
            .content_type("text/html; charset=utf-8")
            .with_body(body.into().into_bytes())
    }

    /// 200 response with a plain text body
    pub fn text(body: impl Into<String>) -> Self {
        Self::ok()
            .content_type("text/plain; charset=utf-8")
            .with_body(body.into().into_bytes())
    }

    /// 200 response with a JSON body
    pub fn json<T: Serialize>(value: &T) -> Result<Self, crate::Error> {
        Self::ok().with_json(value)
    }

    /// Render an error as a JSON response.
    ///
    /// Server errors never expose their message: the body only names the status.
    pub fn from_error(error: &crate::Error) -> Self {
        let status = error.http_status();
        let message = if status.is_server_error() {
            status.reason().to_string()
        } else {
            error.to_string()
        };

        let body = serde_json::json!({ "error": message });
        Self::new(status.code())
            .content_type("application/json")
            .with_body(body.to_string().into_bytes())
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn with_json<T: Serialize>(mut self, value: &T) -> Result<Self, crate::Error> {
        self.body =
            serde_json::to_vec(value).map_err(|e| crate::Error::Serialization(e.to_string()))?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn content_type(self, value: &str) -> Self {
        self.with_header("Content-Type".to_string(), value.to_string())
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Body decoded as UTF-8, lossily
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Parse a query string into a map of parameters
fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let mut split = part.splitn(2, '=');
            let key = split.next()?;
            let value = split.next().unwrap_or("");
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}
