use super::register::check_password;
use crate::{
  types::requirements::{self, Field, FieldSource, Value},
  util::Sensitive,
};
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidateError};

/// Partial profile update. Absent fields keep their stored value.
///
/// `name`, `cpf` and `cnpj` cannot be changed: the form only records
/// whether any of them was sent, even as `null`, so the whole request
/// can be refused.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Request {
  pub birth_date: Option<String>,
  pub rg: Option<Sensitive<String>>,
  pub phone: Option<String>,
  pub email: Option<String>,
  pub password: Option<Sensitive<String>>,
  pub company_name: Option<String>,
  pub trade_name: Option<String>,
  pub contact_name: Option<String>,
  pub contact_email: Option<String>,
  pub contact_phone: Option<String>,
  pub contact_cpf: Option<Sensitive<String>>,
  pub contact_rg: Option<Sensitive<String>>,
  pub contact_birth_date: Option<String>,
  pub services: Option<Vec<String>>,
  pub cnpj_card: Option<Sensitive<String>>,

  #[serde(deserialize_with = "sent", skip_serializing)]
  name: bool,
  #[serde(deserialize_with = "sent", skip_serializing)]
  cpf: bool,
  #[serde(deserialize_with = "sent", skip_serializing)]
  cnpj: bool,
}

fn sent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
  IgnoredAny::deserialize(deserializer).map(|_| true)
}

impl Request {
  /// Whether the body tried to touch `name`, `cpf` or `cnpj`.
  #[must_use]
  pub fn touches_immutable_fields(&self) -> bool {
    self.name || self.cpf || self.cnpj
  }
}

impl FieldSource for Request {
  fn value(&self, field: Field) -> Value<'_> {
    let text = match field {
      Field::Name | Field::Cpf | Field::Cnpj => None,
      Field::BirthDate => self.birth_date.as_deref(),
      Field::Rg => self.rg.as_ref().map(Sensitive::as_str),
      Field::Phone => self.phone.as_deref(),
      Field::Email => self.email.as_deref(),
      Field::CompanyName => self.company_name.as_deref(),
      Field::TradeName => self.trade_name.as_deref(),
      Field::CnpjCard => self.cnpj_card.as_ref().map(Sensitive::as_str),
      Field::ContactName => self.contact_name.as_deref(),
      Field::ContactEmail => self.contact_email.as_deref(),
      Field::ContactPhone => self.contact_phone.as_deref(),
      Field::ContactCpf => self.contact_cpf.as_ref().map(Sensitive::as_str),
      Field::ContactRg => self.contact_rg.as_ref().map(Sensitive::as_str),
      Field::ContactBirthDate => self.contact_birth_date.as_deref(),
      Field::Services => return Value::List(self.services.as_deref()),
    };
    Value::Text(text)
  }
}

impl Validate for Request {
  fn validate(&self) -> Result<(), ValidateError> {
    if self.touches_immutable_fields() {
      return Err(ValidateError::form("Name, CPF and CNPJ cannot be changed."));
    }

    let mut errors = ValidateError::builder();
    requirements::check_optional(&[], self, &mut errors);

    if let Some(password) = self.password.as_ref() {
      check_password(password.as_str(), &mut errors);
    }

    errors.build().into_result()
  }
}
