//! Documentation middleware
//!
//! Serves the generated documentation at the configured root and forwards
//! every other request untouched.

use crate::builder::DocsBuilder;
use crate::render::{html_response, json_response, yaml_response};
use crate::spec::ApiDocumentation;
use restifier_core::{Error, HttpRequest, HttpResponse, Middleware, Next, RequestHandler};
use restifier_validation::RouteTable;
use std::sync::Arc;
use tracing::{debug, trace};

/// Documentation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsConfig {
    /// Path the documentation is served at
    pub api_base: String,
    /// Overview text shown above the route list
    pub api_overview: String,
    /// HTML page title
    pub title: String,
}

impl DocsConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::default()
        }
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.api_overview = overview.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            api_overview: String::new(),
            title: "API Documentation".to_string(),
        }
    }
}

/// Rendering selected by `?format=` or the `Accept` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocsFormat {
    Html,
    Json,
    Yaml,
}

impl DocsFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "html" => Some(DocsFormat::Html),
            "json" => Some(DocsFormat::Json),
            "yaml" | "yml" => Some(DocsFormat::Yaml),
            _ => None,
        }
    }

    /// An explicit `format` query parameter wins over `Accept`
    pub fn negotiate(request: &HttpRequest) -> Self {
        if let Some(format) = request.query("format").and_then(|name| Self::from_name(name)) {
            format
        } else if request.accepts("application/json") {
            DocsFormat::Json
        } else if request.accepts("application/x-yaml") || request.accepts("text/yaml") {
            DocsFormat::Yaml
        } else {
            DocsFormat::Html
        }
    }
}

/// Middleware answering requests for the documentation root
#[derive(Debug, Clone)]
pub struct DocsMiddleware {
    config: DocsConfig,
    root: String,
    doc: Arc<ApiDocumentation>,
}

impl DocsMiddleware {
    /// Build the documentation for a route table once, up front
    pub fn new(config: DocsConfig, routes: &RouteTable) -> Self {
        let doc = DocsBuilder::new(config.api_base.clone())
            .overview(config.api_overview.clone())
            .routes(routes)
            .build();
        Self::from_documentation(config, doc)
    }

    /// Serve a prebuilt artifact
    pub fn from_documentation(config: DocsConfig, doc: ApiDocumentation) -> Self {
        Self {
            root: normalize(&config.api_base),
            config,
            doc: Arc::new(doc),
        }
    }

    pub fn config(&self) -> &DocsConfig {
        &self.config
    }

    pub fn documentation(&self) -> &ApiDocumentation {
        &self.doc
    }

    /// Whether a request path addresses the documentation root
    pub fn is_docs_path(&self, path: &str) -> bool {
        normalize(path) == self.root
    }

    /// Render the documentation for a request
    pub fn render(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let format = DocsFormat::negotiate(request);
        debug!(path = %request.path, format = ?format, "Serving API documentation");
        match format {
            DocsFormat::Json => json_response(&self.doc),
            DocsFormat::Yaml => yaml_response(&self.doc),
            DocsFormat::Html => Ok(html_response(&self.doc, &self.config.title)),
        }
    }

    /// Wrap a handler so the documentation root is answered before it
    pub fn wrap<H: RequestHandler>(self, inner: H) -> Documented<H> {
        Documented { docs: self, inner }
    }
}

impl Middleware for DocsMiddleware {
    fn handle(&self, req: HttpRequest, next: Next<'_>) -> Result<HttpResponse, Error> {
        if self.is_docs_path(&req.path) {
            return self.render(&req);
        }
        trace!(path = %req.path, "Forwarding request past documentation");
        next(req)
    }
}

/// A handler fronted by [`DocsMiddleware`]
#[derive(Debug)]
pub struct Documented<H> {
    docs: DocsMiddleware,
    inner: H,
}

impl<H> Documented<H> {
    pub fn docs(&self) -> &DocsMiddleware {
        &self.docs
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: RequestHandler> RequestHandler for Documented<H> {
    fn handle(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        Middleware::handle(&self.docs, request, Box::new(|req| self.inner.handle(req)))
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
