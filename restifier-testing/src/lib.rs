//! Testing utilities for Restifier.
//!
//! [`TestClient`] drives any [`RequestHandler`](restifier_core::RequestHandler)
//! with in-memory requests. Handler errors are rendered into responses the
//! same way a server boundary would render them, so tests observe status
//! codes rather than `Err` values.
//!
//! ## Quick Start
//!
//! ```
//! use restifier_core::{Error, HttpRequest, HttpResponse};
//! use restifier_testing::*;
//! use serde_json::json;
//!
//! let client = TestClient::new(|req: HttpRequest| -> Result<HttpResponse, Error> {
//!     match req.path.as_str() {
//!         "/hello" => HttpResponse::json(&json!({"hello": "world"})),
//!         _ => Err(Error::NotFound(req.path)),
//!     }
//! });
//!
//! let response = client.get("/hello");
//! response.assert_status(200);
//! assert_json_field(&response, "hello", &json!("world"));
//!
//! client.get("/nope").assert_status(404);
//! ```

mod assertions;
mod test_client;

pub use assertions::*;
pub use test_client::*;
