// Middleware system for request/response processing

use crate::logging::{debug, info, trace, warn};
use crate::{Error, HttpRequest, HttpResponse, RequestHandler};
use std::sync::Arc;

/// The rest of the middleware chain, ending in the wrapped handler
pub type Next<'a> = Box<dyn FnOnce(HttpRequest) -> Result<HttpResponse, Error> + 'a>;

/// Middleware trait for processing requests before they reach the handler
pub trait Middleware: Send + Sync {
    /// Process the request and optionally pass to next middleware
    fn handle(&self, req: HttpRequest, next: Next<'_>) -> Result<HttpResponse, Error>;
}

/// Middleware chain executor
#[derive(Clone)]
pub struct MiddlewareChain {
    middlewares: Arc<Vec<Arc<dyn Middleware>>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self {
            middlewares: Arc::new(Vec::new()),
        }
    }

    /// Add a middleware to the chain
    pub fn use_middleware<M: Middleware + 'static>(&mut self, middleware: M) {
        let mut mws = (*self.middlewares).clone();
        mws.push(Arc::new(middleware));
        self.middlewares = Arc::new(mws);
    }

    /// Number of middleware in the chain
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Execute the middleware chain with a handler
    pub fn apply(
        &self,
        req: HttpRequest,
        handler: &dyn RequestHandler,
    ) -> Result<HttpResponse, Error> {
        debug!(
            middleware_count = self.middlewares.len(),
            path = %req.path,
            method = %req.method,
            "Executing middleware chain"
        );
        self.execute_from(0, req, handler)
    }

    /// Execute the chain and render any escaping error as a response.
    ///
    /// This is the boundary where handler faults become 5xx responses.
    pub fn respond(&self, req: HttpRequest, handler: &dyn RequestHandler) -> HttpResponse {
        match self.apply(req, handler) {
            Ok(response) => response,
            Err(error) => {
                if error.is_server_error() {
                    warn!(error = %error, "Request failed with a server error");
                }
                HttpResponse::from_error(&error)
            }
        }
    }

    fn execute_from(
        &self,
        index: usize,
        req: HttpRequest,
        handler: &dyn RequestHandler,
    ) -> Result<HttpResponse, Error> {
        match self.middlewares.get(index) {
            None => {
                trace!("Middleware chain complete, calling handler");
                handler.handle(req)
            }
            Some(middleware) => {
                trace!(middleware_index = index, "Executing middleware");
                middleware.handle(
                    req,
                    Box::new(move |req| self.execute_from(index + 1, req, handler)),
                )
            }
        }
    }
}

impl Default for MiddlewareChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Request logging middleware
pub struct LoggerMiddleware {
    pub log_body: bool,
}

impl LoggerMiddleware {
    pub fn new() -> Self {
        Self { log_body: false }
    }

    pub fn with_body(mut self) -> Self {
        self.log_body = true;
        self
    }
}

impl Default for LoggerMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for LoggerMiddleware {
    fn handle(&self, req: HttpRequest, next: Next<'_>) -> Result<HttpResponse, Error> {
        let start = std::time::Instant::now();
        let method = req.method.clone();
        let path = req.path.clone();

        if self.log_body && !req.body.is_empty() {
            info!(%method, %path, body_bytes = req.body.len(), "Request received");
        } else {
            info!(%method, %path, "Request received");
        }

        let result = next(req);
        let elapsed_us = start.elapsed().as_micros() as u64;

        match &result {
            Ok(response) => {
                info!(%method, %path, status = response.status, elapsed_us, "Request completed");
            }
            Err(e) => {
                warn!(%method, %path, error = %e, elapsed_us, "Request failed");
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Tag(&'static str, Arc<Mutex<Vec<&'static str>>>);

    impl Middleware for Tag {
        fn handle(&self, req: HttpRequest, next: Next<'_>) -> Result<HttpResponse, Error> {
            self.1.lock().unwrap().push(self.0);
            next(req)
        }
    }

    struct ShortCircuit;

    impl Middleware for ShortCircuit {
        fn handle(&self, _req: HttpRequest, _next: Next<'_>) -> Result<HttpResponse, Error> {
            Ok(HttpResponse::new(204))
        }
    }

    fn ok_handler(_req: HttpRequest) -> Result<HttpResponse, Error> {
        Ok(HttpResponse::ok())
    }

    #[test]
    fn test_middleware_chain_runs_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut chain = MiddlewareChain::new();
        chain.use_middleware(Tag("first", seen.clone()));
        chain.use_middleware(Tag("second", seen.clone()));

        let result = chain.apply(HttpRequest::new("GET", "/test"), &ok_handler);

        assert_eq!(result.unwrap().status, 200);
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_middleware_can_short_circuit() {
        let mut chain = MiddlewareChain::new();
        chain.use_middleware(ShortCircuit);

        let failing = |_req: HttpRequest| -> Result<HttpResponse, Error> {
            Err(Error::Internal("should not run".into()))
        };
        let result = chain.apply(HttpRequest::new("GET", "/test"), &failing);

        assert_eq!(result.unwrap().status, 204);
    }

    #[test]
    fn test_respond_converts_errors() {
        let chain = MiddlewareChain::new();
        let failing = |_req: HttpRequest| -> Result<HttpResponse, Error> {
            Err(Error::Internal("secret".into()))
        };

        let response = chain.respond(HttpRequest::new("POST", "/test"), &failing);
        assert_eq!(response.status, 500);
        assert!(!response.body_text().contains("secret"));
    }

    #[test]
    fn test_logger_middleware_passes_through() {
        let mut chain = MiddlewareChain::new();
        chain.use_middleware(LoggerMiddleware::new().with_body());

        let req = HttpRequest::new("POST", "/test").with_body("{}");
        assert_eq!(chain.apply(req, &ok_handler).unwrap().status, 200);
    }
}
