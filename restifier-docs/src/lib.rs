//! API documentation for Restifier route tables
//!
//! The documentation artifact is built once from an explicit [`RouteTable`]:
//! every route carrying binding metadata contributes its method, path and the
//! field descriptions of its input and output schemas. [`DocsMiddleware`]
//! serves the artifact at a configured root as HTML, JSON or YAML and forwards
//! every other request to the wrapped handler.
//!
//! ## Quick Start
//!
//! ```
//! use restifier_core::{HttpMethod, HttpRequest, RequestHandler};
//! use restifier_docs::{DocsConfig, DocsMiddleware};
//! use restifier_validation::{api, ApiRoute, MessageSchema, Property, RouteTable};
//!
//! let schema = MessageSchema::builder("Echo")
//!     .property(Property::string("text").description("Text to echo"))
//!     .build()
//!     .unwrap();
//!
//! let routes = RouteTable::new(vec![ApiRoute::api(
//!     HttpMethod::POST,
//!     "/echo",
//!     api(schema.clone(), schema, |message| Ok(message.into())),
//! )]);
//!
//! let docs = DocsMiddleware::new(
//!     DocsConfig::new("/api").with_overview("Echo service"),
//!     &routes,
//! );
//! assert_eq!(docs.documentation().routes.len(), 1);
//!
//! let app = docs.wrap(routes);
//! let response = app.handle(HttpRequest::new("GET", "/api")).unwrap();
//! assert!(response.body_text().contains("Text to echo"));
//! ```
//!
//! [`RouteTable`]: restifier_validation::RouteTable

pub mod builder;
pub mod middleware;
pub mod render;
pub mod spec;

pub use builder::*;
pub use middleware::*;
pub use render::*;
pub use spec::*;
