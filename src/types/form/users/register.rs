use crate::{
  types::{
    id::{marker::UserMarker, Id},
    requirements::{self, Field, FieldSource, Rule, Value},
    validation::{is_strong_password, PASSWORD_MAX},
    PersonType, Role,
  },
  util::Sensitive,
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateError};

/// Signup form. Every field is optional on the wire so that missing
/// values are reported per field instead of failing the whole body.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Request {
  pub role: Option<Role>,
  pub person_type: Option<PersonType>,
  pub name: Option<String>,
  pub birth_date: Option<String>,
  pub cpf: Option<Sensitive<String>>,
  pub rg: Option<Sensitive<String>>,
  pub phone: Option<String>,
  pub email: Option<String>,
  pub password: Option<Sensitive<String>>,
  pub cnpj: Option<String>,
  pub company_name: Option<String>,
  pub trade_name: Option<String>,
  pub contact_name: Option<String>,
  pub contact_email: Option<String>,
  pub contact_phone: Option<String>,
  pub contact_cpf: Option<Sensitive<String>>,
  pub contact_rg: Option<Sensitive<String>>,
  pub contact_birth_date: Option<String>,
  pub cnpj_card: Option<Sensitive<String>>,
  pub services: Option<Vec<String>>,
}

impl FieldSource for Request {
  fn value(&self, field: Field) -> Value<'_> {
    let text = match field {
      Field::Name => self.name.as_deref(),
      Field::BirthDate => self.birth_date.as_deref(),
      Field::Cpf => self.cpf.as_ref().map(Sensitive::as_str),
      Field::Rg => self.rg.as_ref().map(Sensitive::as_str),
      Field::Phone => self.phone.as_deref(),
      Field::Email => self.email.as_deref(),
      Field::Cnpj => self.cnpj.as_deref(),
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

/// Password policy shared by signup and profile updates.
pub(crate) fn check_password(password: &str, errors: &mut validator::ErrorBuilder) {
  if password.chars().count() > PASSWORD_MAX {
    errors.field(
      "password",
      format!("Passwords must be at most {PASSWORD_MAX} characters."),
    );
  } else if !is_strong_password(password) {
    errors.field(
      "password",
      "Passwords need at least 8 characters with letters and numbers.",
    );
  }
}

impl Validate for Request {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut errors = ValidateError::builder();

    let rows = match (self.role, self.person_type) {
      (None, _) => {
        errors.field("role", "Choose an account type.");
        None
      },
      (Some(..), None) => {
        errors.field("personType", "Choose CPF or CNPJ.");
        None
      },
      (Some(role), Some(person_type)) => requirements::table(role, person_type).or_else(|| {
        errors.field("personType", "Clients must register with a CPF.");
        requirements::table(role, PersonType::Cpf)
      }),
    };

    match rows {
      Some(rows) => {
        requirements::check(rows, self, &mut errors);
        requirements::check_optional(rows, self, &mut errors);
      },
      None => {
        let email = requirements::Requirement {
          field: Field::Email,
          rule: Rule::Email,
          missing: "Enter your e-mail address.",
        };
        requirements::check(&[email], self, &mut errors);
      },
    }

    match self.password.as_ref().map(Sensitive::as_str) {
      Some(password) if !password.is_empty() => check_password(password, &mut errors),
      _ => {
        errors.field("password", "Enter a password.");
      },
    }

    errors.build().into_result()
  }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
  pub id: Id<UserMarker>,
  pub role: Role,
  pub person_type: PersonType,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils;

  #[track_caller]
  fn fails_on(form: &Request, field: &str) -> ValidateError {
    let error = form.validate().unwrap_err();
    assert!(error.has_field(field), "expected error on {field}: {error:?}");
    error
  }

  #[test]
  fn valid_forms_pass() {
    test_utils::client_form().validate().unwrap();
    test_utils::professional_form().validate().unwrap();
    test_utils::company_form().validate().unwrap();
  }

  #[test]
  fn client_without_cpf() {
    let mut form = test_utils::client_form();
    form.cpf = None;
    let error = fails_on(&form, "cpf");
    assert_eq!(error.field_errors().len(), 1);
    assert_eq!(error.field("cpf").unwrap(), ["Enter your CPF."]);
  }

  #[test]
  fn client_with_invalid_cpf() {
    let mut form = test_utils::client_form();
    form.cpf = Some("111.444.777-36".into());
    let error = fails_on(&form, "cpf");
    assert_eq!(error.field("cpf").unwrap(), ["Invalid CPF."]);
  }

  #[test]
  fn clients_cannot_be_companies() {
    let mut form = test_utils::client_form();
    form.person_type = Some(PersonType::Cnpj);
    let error = fails_on(&form, "personType");
    assert_eq!(error.field_errors().len(), 1);
  }

  #[test]
  fn company_without_cnpj_card() {
    let mut form = test_utils::company_form();
    form.cnpj_card = None;
    let error = fails_on(&form, "cnpjCard");
    assert_eq!(error.field("cnpjCard").unwrap(), ["Upload the CNPJ card."]);

    form.cnpj_card = Some("data:application/zip;base64,UEsDBA==".into());
    fails_on(&form, "cnpjCard");
  }

  #[test]
  fn company_does_not_need_a_personal_name() {
    let mut form = test_utils::company_form();
    form.name = None;
    form.cpf = None;
    form.rg = None;
    form.phone = None;
    form.validate().unwrap();
  }

  #[test]
  fn professionals_pick_services() {
    let mut form = test_utils::professional_form();
    form.services = Some(vec!["  ".into()]);
    fails_on(&form, "services");

    form.services = None;
    fails_on(&form, "services");

    // clients never need them
    let mut form = test_utils::client_form();
    form.services = None;
    form.validate().unwrap();
  }

  #[test]
  fn missing_role() {
    let mut form = test_utils::client_form();
    form.role = None;
    form.email = Some("nope".into());
    let error = fails_on(&form, "role");
    assert!(error.has_field("email"));
  }

  #[test]
  fn password_policy() {
    for password in ["abcdefgh", "12345678", "abc1", ""] {
      let mut form = test_utils::client_form();
      form.password = Some(password.into());
      fails_on(&form, "password");
    }

    let mut form = test_utils::client_form();
    form.password = Some("abcdefg1".into());
    form.validate().unwrap();

    form.password = None;
    fails_on(&form, "password");
  }

  #[test]
  fn optional_contact_email_is_still_checked() {
    let mut form = test_utils::client_form();
    form.contact_email = Some("not an email".into());
    fails_on(&form, "contactEmail");
  }

  #[test]
  fn lowercase_enums_are_accepted() {
    let form: Request = serde_json::from_value(serde_json::json!({
      "role": "professional",
      "personType": "cnpj",
    }))
    .unwrap();
    assert_eq!(form.role, Some(Role::Professional));
    assert_eq!(form.person_type, Some(PersonType::Cnpj));
  }
}
