//! Which registration fields are mandatory, per role and person type.
//!
//! The policy is a lookup table rather than branching code: each row
//! lists the fields an account of that kind must fill in, how each
//! value is checked and what to say when it is left blank.
use std::borrow::Cow;
use validator::extras::{is_valid_cnpj, is_valid_cpf, is_valid_phone};
use validator::{ErrorBuilder, HasLength};

use super::user::{PersonType, Role};
use super::validation::{
  is_valid_date, is_valid_document, is_valid_email, normalize_services, NAME_MAX, RG_MAX,
  SERVICES_MAX, SERVICE_MAX,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
  Name,
  BirthDate,
  Cpf,
  Rg,
  Phone,
  Email,
  Cnpj,
  CompanyName,
  TradeName,
  CnpjCard,
  ContactName,
  ContactEmail,
  ContactPhone,
  ContactCpf,
  ContactRg,
  ContactBirthDate,
  Services,
}

impl Field {
  pub const ALL: [Field; 17] = [
    Self::Name,
    Self::BirthDate,
    Self::Cpf,
    Self::Rg,
    Self::Phone,
    Self::Email,
    Self::Cnpj,
    Self::CompanyName,
    Self::TradeName,
    Self::CnpjCard,
    Self::ContactName,
    Self::ContactEmail,
    Self::ContactPhone,
    Self::ContactCpf,
    Self::ContactRg,
    Self::ContactBirthDate,
    Self::Services,
  ];

  /// The check every value of this field goes through, whether the
  /// field is mandatory or not.
  #[must_use]
  pub const fn rule(self) -> Rule {
    match self {
      Self::Name | Self::CompanyName | Self::TradeName | Self::ContactName => {
        Rule::Text { max: NAME_MAX }
      },
      Self::Rg | Self::ContactRg => Rule::Text { max: RG_MAX },
      Self::BirthDate | Self::ContactBirthDate => Rule::Date,
      Self::Cpf | Self::ContactCpf => Rule::Cpf,
      Self::Cnpj => Rule::Cnpj,
      Self::Phone | Self::ContactPhone => Rule::Phone,
      Self::Email | Self::ContactEmail => Rule::Email,
      Self::CnpjCard => Rule::Document,
      Self::Services => Rule::Services,
    }
  }

  /// Name of the field in request bodies and error maps.
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Name => "name",
      Self::BirthDate => "birthDate",
      Self::Cpf => "cpf",
      Self::Rg => "rg",
      Self::Phone => "phone",
      Self::Email => "email",
      Self::Cnpj => "cnpj",
      Self::CompanyName => "companyName",
      Self::TradeName => "tradeName",
      Self::CnpjCard => "cnpjCard",
      Self::ContactName => "contactName",
      Self::ContactEmail => "contactEmail",
      Self::ContactPhone => "contactPhone",
      Self::ContactCpf => "contactCpf",
      Self::ContactRg => "contactRg",
      Self::ContactBirthDate => "contactBirthDate",
      Self::Services => "services",
    }
  }
}

/// How a present value is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
  Text { max: usize },
  Date,
  Cpf,
  Cnpj,
  Phone,
  Email,
  Document,
  Services,
}

/// A field value as read from a form.
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
  Text(Option<&'a str>),
  List(Option<&'a [String]>),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
  Valid,
  Missing,
  Invalid(Cow<'static, str>),
}

impl Rule {
  #[must_use]
  pub fn apply(self, value: Value<'_>) -> Outcome {
    match (self, value) {
      (Self::Services, Value::List(list)) => {
        let services = normalize_services(list.unwrap_or_default());
        if services.is_empty() {
          Outcome::Missing
        } else if services.len() > SERVICES_MAX {
          Outcome::Invalid(format!("Select at most {SERVICES_MAX} services.").into())
        } else if services.iter().any(|s| s.length() > SERVICE_MAX) {
          Outcome::Invalid(format!("Service names are limited to {SERVICE_MAX} characters.").into())
        } else {
          Outcome::Valid
        }
      },
      (_, Value::List(..)) | (Self::Services, Value::Text(..)) => {
        Outcome::Invalid("Unexpected value type.".into())
      },
      (rule, Value::Text(text)) => match text.map(str::trim).filter(|v| !v.is_empty()) {
        None => Outcome::Missing,
        Some(text) => rule.apply_text(text),
      },
    }
  }

  fn apply_text(self, text: &str) -> Outcome {
    let (valid, message): (bool, Cow<'static, str>) = match self {
      Self::Text { max } => (
        text.length() <= max,
        format!("Must be at most {max} characters.").into(),
      ),
      Self::Date => (is_valid_date(text), "Enter a valid date.".into()),
      Self::Cpf => (is_valid_cpf(text), "Invalid CPF.".into()),
      Self::Cnpj => (is_valid_cnpj(text), "Invalid CNPJ.".into()),
      Self::Phone => (is_valid_phone(text), "Invalid phone number.".into()),
      Self::Email => (is_valid_email(text), "Invalid e-mail address.".into()),
      Self::Document => (
        is_valid_document(text),
        "Upload the CNPJ card as a PDF or an image.".into(),
      ),
      Self::Services => (false, "Unexpected value type.".into()),
    };

    if valid {
      Outcome::Valid
    } else {
      Outcome::Invalid(message)
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
  pub field: Field,
  pub rule: Rule,
  /// Shown when the value is absent or blank.
  pub missing: &'static str,
}

const fn required(field: Field, missing: &'static str) -> Requirement {
  Requirement {
    field,
    rule: field.rule(),
    missing,
  }
}

const CLIENT: &[Requirement] = &[
  required(Field::Name, "Enter your full name."),
  required(Field::BirthDate, "Enter a valid date."),
  required(Field::Cpf, "Enter your CPF."),
  required(Field::Rg, "Enter your RG."),
  required(Field::Phone, "Enter your phone number."),
  required(Field::Email, "Enter your e-mail address."),
];

const PROFESSIONAL_INDIVIDUAL: &[Requirement] = &[
  required(Field::Name, "Enter your full name."),
  required(Field::BirthDate, "Enter a valid date."),
  required(Field::Cpf, "Enter your CPF."),
  required(Field::Rg, "Enter your RG."),
  required(Field::Phone, "Enter your phone number."),
  required(Field::Email, "Enter your e-mail address."),
  required(Field::Services, "Select at least one service."),
];

const PROFESSIONAL_COMPANY: &[Requirement] = &[
  required(Field::Cnpj, "Enter the CNPJ."),
  required(Field::BirthDate, "Enter the incorporation date."),
  required(Field::CompanyName, "Enter the company's legal name."),
  required(Field::TradeName, "Enter the trade name."),
  required(Field::CnpjCard, "Upload the CNPJ card."),
  required(Field::ContactName, "Enter the responsible person's name."),
  required(Field::ContactEmail, "Enter the responsible person's e-mail."),
  required(Field::ContactPhone, "Enter the responsible person's phone."),
  required(Field::ContactCpf, "Enter the responsible person's CPF."),
  required(Field::ContactRg, "Enter the responsible person's RG."),
  required(Field::ContactBirthDate, "Enter the responsible person's birth date."),
  required(Field::Email, "Enter your e-mail address."),
  required(Field::Services, "Select at least one service."),
];

/// Mandatory fields for an account of the given kind. Clients can
/// only register as individuals, so `(Client, Cnpj)` has no row.
#[must_use]
pub fn table(role: Role, person_type: PersonType) -> Option<&'static [Requirement]> {
  match (role, person_type) {
    (Role::Client, PersonType::Cpf) => Some(CLIENT),
    (Role::Client, PersonType::Cnpj) => None,
    (Role::Professional, PersonType::Cpf) => Some(PROFESSIONAL_INDIVIDUAL),
    (Role::Professional, PersonType::Cnpj) => Some(PROFESSIONAL_COMPANY),
  }
}

/// Something that can hand out its values by [`Field`].
pub trait FieldSource {
  fn value(&self, field: Field) -> Value<'_>;
}

/// Checks every requirement against `source`, recording one message
/// per failing field.
pub fn check(requirements: &[Requirement], source: &impl FieldSource, errors: &mut ErrorBuilder) {
  for requirement in requirements {
    match requirement.rule.apply(source.value(requirement.field)) {
      Outcome::Valid => {},
      Outcome::Missing => {
        errors.field(requirement.field.name(), requirement.missing);
      },
      Outcome::Invalid(message) => {
        errors.field(requirement.field.name(), message);
      },
    }
  }
}

/// Checks every field of `source` that is not listed in
/// `requirements`, reporting only values that are present and
/// invalid.
pub fn check_optional(
  requirements: &[Requirement],
  source: &impl FieldSource,
  errors: &mut ErrorBuilder,
) {
  let optional = Field::ALL
    .into_iter()
    .filter(|field| !requirements.iter().any(|r| r.field == *field));

  for field in optional {
    if let Outcome::Invalid(message) = field.rule().apply(source.value(field)) {
      errors.field(field.name(), message);
    }
  }
}
