use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Error {
  Internal,
  InvalidFormBody(validator::ValidateError),
  InvalidCredentials,
  Conflict { field: String },
  NotFound,
  ReadonlyMode,
}

impl Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Error::Internal => f.write_str("Failed to perform request"),
      Error::InvalidFormBody(..) => f.write_str("Invalid form body"),
      Error::InvalidCredentials => f.write_str("Invalid e-mail or password"),
      Error::Conflict { field } => write!(f, "This {field} is already registered"),
      Error::NotFound => f.write_str("Not found"),
      Error::ReadonlyMode => f.write_str("Service is in read-only mode"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_test::Token;
  use validator::ValidateError;

  #[track_caller]
  fn assert_unit_variant(value: Error, variant: &'static str) {
    serde_test::assert_tokens(
      &value,
      &[
        Token::Struct {
          name: "Error",
          len: 1,
        },
        Token::Str("type"),
        Token::Str(variant),
        Token::StructEnd,
      ],
    );
  }

  #[test]
  fn test_serde_impl() {
    assert_unit_variant(Error::Internal, "internal");
    assert_unit_variant(Error::InvalidCredentials, "invalid_credentials");
    assert_unit_variant(Error::NotFound, "not_found");
    assert_unit_variant(Error::ReadonlyMode, "readonly_mode");
  }

  #[test]
  fn conflict_names_the_field() {
    let error = Error::Conflict {
      field: "email".into(),
    };
    let value = serde_json::to_value(&error).unwrap();
    assert_eq!(value, serde_json::json!({ "type": "conflict", "field": "email" }));
    assert_eq!(error.to_string(), "This email is already registered");
  }

  #[test]
  fn invalid_form_body_inlines_the_errors() {
    let error = Error::InvalidFormBody(ValidateError::single("cpf", "Invalid CPF."));
    let value = serde_json::to_value(&error).unwrap();
    assert_eq!(
      value,
      serde_json::json!({
        "type": "invalid_form_body",
        "formErrors": [],
        "fieldErrors": { "cpf": ["Invalid CPF."] },
      })
    );

    let back: Error = serde_json::from_value(value).unwrap();
    assert_eq!(back, error);
  }
}
