use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub type Message = Cow<'static, str>;

/// Collects validation messages before turning them into a
/// [`ValidateError`]. Empty builders produce an empty error, which
/// [`ValidateError::into_result`] treats as success.
#[derive(Debug, Default)]
pub struct ErrorBuilder {
  inner: ValidateError,
}

impl ErrorBuilder {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a message that is not tied to any field.
  pub fn form(&mut self, message: impl Into<Message>) -> &mut Self {
    self.inner.form_errors.push(message.into());
    self
  }

  pub fn field(&mut self, name: impl Into<Message>, message: impl Into<Message>) -> &mut Self {
    self
      .inner
      .field_errors
      .entry(name.into())
      .or_default()
      .push(message.into());
    self
  }

  /// Adds `message` to `name` only if `failed` is true.
  pub fn check(
    &mut self,
    failed: bool,
    name: impl Into<Message>,
    message: impl Into<Message>,
  ) -> &mut Self {
    if failed {
      self.field(name, message);
    }
    self
  }

  pub fn merge(&mut self, other: ValidateError) -> &mut Self {
    self.inner.form_errors.extend(other.form_errors);
    for (name, messages) in other.field_errors {
      self.inner.field_errors.entry(name).or_default().extend(messages);
    }
    self
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.inner.is_empty()
  }

  #[must_use]
  pub fn build(self) -> ValidateError {
    self.inner
  }
}

// ---------------------------------------------------- //

/// Validation failure as a form-level list of messages plus a map of
/// messages per field, in insertion order.
///
/// It serializes as:
/// ```json
/// { "formErrors": [], "fieldErrors": { "cpf": ["Invalid CPF"] } }
/// ```
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateError {
  #[serde(default)]
  form_errors: Vec<Message>,
  #[serde(default)]
  field_errors: IndexMap<Message, Vec<Message>>,
}

impl std::fmt::Display for ValidateError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("Invalid data occurred")
  }
}

impl std::error::Error for ValidateError {}

impl std::fmt::Debug for ValidateError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut map = f.debug_map();
    if !self.form_errors.is_empty() {
      map.entry(&"_form", &self.form_errors);
    }
    map.entries(self.field_errors.iter()).finish()
  }
}

impl ValidateError {
  #[must_use]
  pub fn builder() -> ErrorBuilder {
    ErrorBuilder::new()
  }

  /// Shorthand for an error with a single message on one field.
  #[must_use]
  pub fn single(name: impl Into<Message>, message: impl Into<Message>) -> Self {
    let mut builder = Self::builder();
    builder.field(name, message);
    builder.build()
  }

  /// Shorthand for an error with a single form-level message.
  #[must_use]
  pub fn form(message: impl Into<Message>) -> Self {
    let mut builder = Self::builder();
    builder.form(message);
    builder.build()
  }
}

impl ValidateError {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.form_errors.is_empty() && self.field_errors.values().all(Vec::is_empty)
  }

  #[must_use]
  pub fn form_errors(&self) -> &[Message] {
    &self.form_errors
  }

  #[must_use]
  pub fn field_errors(&self) -> &IndexMap<Message, Vec<Message>> {
    &self.field_errors
  }

  #[must_use]
  pub fn field(&self, name: &str) -> Option<&[Message]> {
    self.field_errors.get(name).map(Vec::as_slice)
  }

  #[must_use]
  pub fn has_field(&self, name: &str) -> bool {
    self.field(name).is_some_and(|v| !v.is_empty())
  }

  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() {
      Ok(())
    } else {
      Err(self)
    }
  }
}
