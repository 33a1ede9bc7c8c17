// Restifier - declarative message schemas and request binding for JSON APIs
//
// Schemas describe each endpoint's input and output; the binding pipeline
// parses, validates, invokes the handler and serializes the result, and the
// documentation middleware describes the whole route table.

// Re-export core functionality
pub use restifier_core::*;

// Re-export the schema engine
pub use restifier_validation as validation;

// Re-export optional crates
#[cfg(feature = "docs")]
pub use restifier_docs as docs;

#[cfg(feature = "config")]
pub use restifier_config as config;

#[cfg(feature = "testing")]
pub use restifier_testing as testing;

/// Everything needed to declare schemas and bind handlers
pub mod prelude {
    pub use crate::{
        Error, HttpMethod, HttpRequest, HttpResponse, Middleware, MiddlewareChain,
        RequestHandler,
    };

    pub use restifier_validation::{
        Api, ApiOutput, ApiRoute, FieldValue, Message, MessageSchema, Property, RouteTable,
        ValidationError, Validator, api, bounds, condition, regex, required,
    };

    #[cfg(feature = "docs")]
    pub use restifier_docs::{DocsConfig, DocsMiddleware};

    #[cfg(feature = "config")]
    pub use restifier_config::{ConfigManager, ServiceConfig};

    #[cfg(feature = "testing")]
    pub use restifier_testing::{TestClient, TestResponse};
}
