// Core library for Restifier
// Request/response types, errors, handler and middleware contracts shared by
// the validation engine and the documentation middleware.

pub mod error;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod status;
pub mod traits;

// Re-export commonly used types
pub use error::*;
pub use http::*;
pub use middleware::*;
pub use status::*;
pub use traits::*;
