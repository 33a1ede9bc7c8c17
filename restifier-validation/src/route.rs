// Route table for bound and plain handlers

use crate::{Api, MessageSchema};
use restifier_core::{Error, HttpMethod, HttpRequest, HttpResponse, RequestHandler};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Input and output schemas attached to a bound route
#[derive(Debug, Clone)]
pub struct Binding {
    pub input: Arc<MessageSchema>,
    pub output: Arc<MessageSchema>,
}

/// One entry of the route table
#[derive(Clone)]
pub struct ApiRoute {
    pub method: HttpMethod,
    pub path: String,
    pub handler: Arc<dyn RequestHandler>,
    pub binding: Option<Binding>,
    pub description: Option<String>,
}

impl ApiRoute {
    /// Route to a bound [`Api`]; its schemas become the route's binding
    pub fn api(method: HttpMethod, path: impl Into<String>, api: Api) -> Self {
        let binding = Binding {
            input: Arc::clone(api.input()),
            output: Arc::clone(api.output()),
        };
        Self {
            method,
            path: normalize_path(&path.into()),
            handler: Arc::new(api),
            binding: Some(binding),
            description: None,
        }
    }

    /// Route to an arbitrary handler without binding metadata
    pub fn plain<H: RequestHandler + 'static>(
        method: HttpMethod,
        path: impl Into<String>,
        handler: H,
    ) -> Self {
        Self {
            method,
            path: normalize_path(&path.into()),
            handler: Arc::new(handler),
            binding: None,
            description: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Debug for ApiRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRoute")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("binding", &self.binding)
            .field("description", &self.description)
            .finish()
    }
}

/// Immutable table of routes with exact method and path dispatch
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Arc<Vec<ApiRoute>>,
}

impl RouteTable {
    pub fn new(routes: Vec<ApiRoute>) -> Self {
        Self {
            routes: Arc::new(routes),
        }
    }

    pub fn routes(&self) -> &[ApiRoute] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the route for a method and path
    pub fn find(&self, method: &str, path: &str) -> Result<&ApiRoute, Error> {
        let path = normalize_path(path);
        let mut path_known = false;
        for route in self.routes.iter().filter(|r| r.path == path) {
            if route.method.as_str().eq_ignore_ascii_case(method) {
                return Ok(route);
            }
            path_known = true;
        }

        if path_known {
            Err(Error::MethodNotAllowed(format!("{} {}", method, path)))
        } else {
            Err(Error::NotFound(format!("{} {}", method, path)))
        }
    }
}

impl FromIterator<ApiRoute> for RouteTable {
    fn from_iter<I: IntoIterator<Item = ApiRoute>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl RequestHandler for RouteTable {
    fn handle(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let route = self.find(&request.method, &request.path)?;
        trace!(method = %route.method, path = %route.path, "Dispatching request");
        route.handler.handle(request)
    }
}

/// Strip a trailing slash; the root stays `/`
pub(crate) fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
