//! Binding pipeline
//!
//! [`Api`] wraps a handler with an input and an output schema and runs every
//! request through four stages, stopping at the first failure:
//!
//! 1. parse the body as a JSON object (400 on failure)
//! 2. check it against the input schema (400 with the error mapping)
//! 3. invoke the handler with the checked message
//! 4. normalize the result into the output schema and serialize it (200)

use crate::{FieldErrors, Message, MessageSchema, PayloadParseError};
use restifier_core::{Error, HttpRequest, HttpResponse, RequestHandler};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Handler signature accepted by [`Api`]
pub type ApiHandler = dyn Fn(Message) -> Result<ApiOutput, Error> + Send + Sync;

/// What a bound handler may return
#[derive(Debug, Clone)]
pub enum ApiOutput {
    /// An already checked message
    Message(Message),
    /// A plain mapping, checked against the output schema
    Data(Value),
}

impl From<Message> for ApiOutput {
    fn from(message: Message) -> Self {
        ApiOutput::Message(message)
    }
}

impl From<Value> for ApiOutput {
    fn from(value: Value) -> Self {
        ApiOutput::Data(value)
    }
}

/// A handler bound to an input and an output schema
#[derive(Clone)]
pub struct Api {
    input: Arc<MessageSchema>,
    output: Arc<MessageSchema>,
    handler: Arc<ApiHandler>,
}

impl Api {
    pub fn new<F>(input: Arc<MessageSchema>, output: Arc<MessageSchema>, handler: F) -> Self
    where
        F: Fn(Message) -> Result<ApiOutput, Error> + Send + Sync + 'static,
    {
        Self {
            input,
            output,
            handler: Arc::new(handler),
        }
    }

    pub fn input(&self) -> &Arc<MessageSchema> {
        &self.input
    }

    pub fn output(&self) -> &Arc<MessageSchema> {
        &self.output
    }

    /// Run the pipeline over raw body bytes
    pub fn call(&self, body: &[u8]) -> Result<HttpResponse, Error> {
        let payload = match parse_payload(body) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(schema = self.input.name(), error = %e, "Request body rejected");
                return payload_error_response(&e);
            }
        };

        let message = match self.input.check_value(&payload) {
            Ok(message) => message,
            Err(e) => return payload_error_response(&e),
        };
        if !message.is_valid() {
            debug!(
                schema = self.input.name(),
                error_count = message.errors().len(),
                "Request failed validation"
            );
            return validation_response(message.errors());
        }

        let output = (self.handler)(message).inspect_err(|e| {
            warn!(schema = self.input.name(), error = %e, "Handler failed");
        })?;

        let message = self.normalize(output)?;
        debug!(schema = self.output.name(), "Request handled");
        let body = message.to_json()?;
        Ok(HttpResponse::ok()
            .content_type("application/json")
            .with_body(body.into_bytes()))
    }

    /// Turn a handler result into a valid instance of the output schema
    fn normalize(&self, output: ApiOutput) -> Result<Message, Error> {
        let message = match output {
            ApiOutput::Message(message) if Arc::ptr_eq(message.schema(), &self.output) => message,
            ApiOutput::Message(message) => self.output.check_value(&message.to_value())?,
            ApiOutput::Data(value) => self.output.check_value(&value)?,
        };

        if message.is_valid() {
            Ok(message)
        } else {
            warn!(
                schema = self.output.name(),
                errors = %message.errors(),
                "Handler output failed its schema"
            );
            Err(Error::Internal(format!(
                "handler output does not satisfy {}: {}",
                self.output.name(),
                message.errors()
            )))
        }
    }
}

impl RequestHandler for Api {
    /// Bodies declared as anything but JSON are refused with 415; an absent
    /// `Content-Type` is read as JSON.
    fn handle(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        if let Some(content_type) = request
            .header("Content-Type")
            .filter(|value| !is_json_media_type(value))
        {
            debug!(schema = self.input.name(), content_type, "Unsupported request media type");
            return Err(Error::UnsupportedMediaType(content_type.to_string()));
        }
        self.call(&request.body)
    }
}

impl fmt::Debug for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("input", &self.input.name())
            .field("output", &self.output.name())
            .finish()
    }
}

/// Bind `handler` to an input and an output schema
pub fn api<F>(input: Arc<MessageSchema>, output: Arc<MessageSchema>, handler: F) -> Api
where
    F: Fn(Message) -> Result<ApiOutput, Error> + Send + Sync + 'static,
{
    Api::new(input, output, handler)
}

/// Parse a request body. An empty body is an empty object.
fn parse_payload(body: &[u8]) -> Result<Value, PayloadParseError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|e| PayloadParseError(e.to_string()))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(PayloadParseError("expected a JSON object".to_string()))
    }
}

/// `application/json` or any `+json` suffix type, parameters ignored
fn is_json_media_type(value: &str) -> bool {
    let media_type = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}

fn payload_error_response(error: &PayloadParseError) -> Result<HttpResponse, Error> {
    HttpResponse::bad_request().with_json(&serde_json::json!({ "error": error.to_string() }))
}

fn validation_response(errors: &FieldErrors) -> Result<HttpResponse, Error> {
    HttpResponse::bad_request().with_json(&errors.to_json())
}
