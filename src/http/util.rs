use actix_web::{
  body::MessageBody,
  dev::{ServiceRequest, ServiceResponse},
  error::JsonPayloadError,
  HttpRequest, HttpResponse,
};
use tracing::{Level, Span};
use tracing_actix_web::{root_span, DefaultRootSpanBuilder, RootSpanBuilder};
use validator::ValidateError;

use super::Error;
use crate::types;

/// Request spans as [`DefaultRootSpanBuilder`] makes them, except the
/// health probe is only logged at debug level.
pub struct QuieterRootSpanBuilder;

impl RootSpanBuilder for QuieterRootSpanBuilder {
  fn on_request_start(request: &ServiceRequest) -> Span {
    if request.path() == "/api/health" {
      root_span!(level = Level::DEBUG, request)
    } else {
      root_span!(request)
    }
  }

  fn on_request_end<B: MessageBody>(
    span: Span,
    outcome: &Result<ServiceResponse<B>, actix_web::Error>,
  ) {
    DefaultRootSpanBuilder::on_request_end(span, outcome);
  }
}

/// Turns a body that cannot be read as JSON (malformed, too large or
/// of the wrong shape) into a form-level error.
pub fn handle_json_error(error: JsonPayloadError, _request: &HttpRequest) -> actix_web::Error {
  let message = match &error {
    JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
      "Request body is too large.".to_string()
    },
    JsonPayloadError::ContentType => "Expected a JSON body.".to_string(),
    JsonPayloadError::Deserialize(e) => format!("Invalid JSON body: {e}"),
    _ => "Invalid JSON body.".to_string(),
  };

  #[derive(Debug, thiserror::Error)]
  #[error("Could not read JSON body: {0}")]
  struct PayloadError(String);

  Error::from_context(
    types::Error::InvalidFormBody(ValidateError::form(message)),
    PayloadError(error.to_string()),
  )
  .into()
}

/// Fallback for routes that do not exist.
pub async fn not_found() -> Result<HttpResponse, Error> {
  #[derive(Debug, thiserror::Error)]
  #[error("No route matched the request")]
  struct RouteNotFound;

  Err(Error::from_context(types::Error::NotFound, RouteNotFound))
}
