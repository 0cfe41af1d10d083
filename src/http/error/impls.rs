use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use error_stack::Report;
use serde::Serialize;

use super::Error;
use crate::{
  database,
  types::Error as ErrorType,
  util::password::{HashPasswordError, VerifyPasswordError},
};

#[derive(Serialize)]
struct Body<'a> {
  #[serde(flatten)]
  error: &'a ErrorType,
  message: String,
}

impl actix_web::ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    match self.error_type {
      ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
      ErrorType::InvalidFormBody(..) => StatusCode::BAD_REQUEST,
      ErrorType::InvalidCredentials => StatusCode::UNAUTHORIZED,
      ErrorType::NotFound => StatusCode::NOT_FOUND,
      ErrorType::Conflict { .. } => StatusCode::CONFLICT,
      ErrorType::ReadonlyMode => StatusCode::SERVICE_UNAVAILABLE,
    }
  }

  fn error_response(&self) -> HttpResponse<BoxBody> {
    match self.error_type {
      ErrorType::Internal => tracing::error!(error = %self, "Internal server error occurred"),
      ErrorType::ReadonlyMode => tracing::warn!("Refused a write, database is read-only"),
      _ => {},
    }

    HttpResponse::build(self.status_code()).json(Body {
      error: &self.error_type,
      message: self.error_type.to_string(),
    })
  }
}

impl From<Report<database::Error>> for Error {
  fn from(value: Report<database::Error>) -> Self {
    let error_type = match value.current_context() {
      database::Error::Readonly => ErrorType::ReadonlyMode,
      database::Error::UniqueViolation(column) => ErrorType::Conflict {
        field: column.clone(),
      },
      _ => ErrorType::Internal,
    };
    Error::from_report(error_type, value)
  }
}

impl From<validator::ValidateError> for Error {
  fn from(value: validator::ValidateError) -> Self {
    #[derive(Debug, thiserror::Error)]
    #[error("Validation error occurred")]
    struct ValidateError;
    Error::from_context(ErrorType::InvalidFormBody(value), ValidateError)
  }
}

impl From<Report<HashPasswordError>> for Error {
  fn from(value: Report<HashPasswordError>) -> Self {
    Error::internal(value)
  }
}

impl From<Report<VerifyPasswordError>> for Error {
  fn from(value: Report<VerifyPasswordError>) -> Self {
    Error::internal(value)
  }
}
