//! Declarative message schemas for Restifier
//!
//! Schemas are ordered lists of typed [`Property`] descriptors, each with a
//! chain of [`Validator`]s. Checking a JSON mapping against a schema yields a
//! [`Message`] holding the converted values and every field error found.
//! [`Api`] binds a handler between an input and an output schema.
//!
//! # Examples
//!
//! ## Checking a message
//!
//! ```
//! use restifier_validation::{MessageSchema, Property, required, regex};
//! use serde_json::json;
//!
//! let schema = MessageSchema::builder("Greeting")
//!     .property(
//!         Property::string("greeting")
//!             .validator(required())
//!             .validator(regex("^[A-Za-z]+$").unwrap()),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let message = schema.check_value(&json!({"greeting": "Hi123"})).unwrap();
//! assert!(!message.is_valid());
//! assert!(message.errors().contains_key("greeting"));
//! ```
//!
//! ## Binding a handler
//!
//! ```
//! use restifier_core::{HttpRequest, RequestHandler};
//! use restifier_validation::{api, MessageSchema, Property, required};
//! use serde_json::json;
//!
//! let input = MessageSchema::builder("Input")
//!     .property(Property::string("name").validator(required()))
//!     .build()
//!     .unwrap();
//! let output = MessageSchema::builder("Output")
//!     .property(Property::string("hello"))
//!     .build()
//!     .unwrap();
//!
//! let hello = api(input, output, |message| {
//!     let name = message.get("name").and_then(|v| v.as_str()).unwrap_or_default();
//!     Ok(json!({"hello": name}).into())
//! });
//!
//! let request = HttpRequest::new("POST", "/hello").with_body(r#"{"name": "Ada"}"#);
//! let response = hello.handle(request).unwrap();
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body_text(), r#"{"hello":"Ada"}"#);
//! ```

mod errors;
mod message;
mod pipe;
mod property;
mod route;
mod traits;
mod validators;
mod value;
mod xml;

pub use errors::*;
pub use message::*;
pub use pipe::*;
pub use property::*;
pub use route::{ApiRoute, Binding, RouteTable};
pub use traits::*;
pub use validators::*;
pub use value::*;
