use crate::{
  types::{
    id::{marker::UserMarker, Id},
    validation::{is_valid_email, PASSWORD_MAX},
    PersonType, Role,
  },
  util::Sensitive,
};
use serde::{Deserialize, Serialize};
use validator::{extras::validate_length, Validate, ValidateError};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Request {
  pub email: String,
  pub password: Sensitive<String>,
}

impl Validate for Request {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut errors = ValidateError::builder();
    errors.check(
      !is_valid_email(self.email.trim()),
      "email",
      "Invalid e-mail address.",
    );
    errors.check(
      !validate_length(self.password.as_str(), Some(1), Some(PASSWORD_MAX)),
      "password",
      "Enter your password.",
    );
    errors.build().into_result()
  }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
  pub id: Id<UserMarker>,
  pub role: Role,
  pub person_type: PersonType,
  pub name: Option<String>,
  pub trade_name: Option<String>,
  pub company_name: Option<String>,
  pub email: String,
  pub display_name: String,
}
