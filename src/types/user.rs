use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// What side of the marketplace an account is on.
///
/// Forms send the lowercase name (`"client"`), responses and the
/// database use the uppercase one (`"CLIENT"`). Both are accepted
/// when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Role {
  #[serde(rename = "CLIENT", alias = "client")]
  Client,
  #[serde(rename = "PROFESSIONAL", alias = "professional")]
  Professional,
}

/// Whether an account is an individual (CPF) or a company (CNPJ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
pub enum PersonType {
  #[serde(rename = "CPF", alias = "cpf")]
  Cpf,
  #[serde(rename = "CNPJ", alias = "cnpj")]
  Cnpj,
}

impl Display for Role {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Client => f.write_str("CLIENT"),
      Self::Professional => f.write_str("PROFESSIONAL"),
    }
  }
}

impl Display for PersonType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Cpf => f.write_str("CPF"),
      Self::Cnpj => f.write_str("CNPJ"),
    }
  }
}

pub const DISPLAY_NAME_FALLBACK: &str = "Usuario";

/// Picks the name shown in greetings and chat headers.
///
/// Companies go by their trade name, then their legal name. People
/// go by the first word of their name. Anything that looks like an
/// email address is never shown.
#[must_use]
pub fn display_name(
  person_type: PersonType,
  name: Option<&str>,
  trade_name: Option<&str>,
  company_name: Option<&str>,
) -> String {
  fn usable(value: Option<&str>) -> Option<&str> {
    value
      .map(str::trim)
      .filter(|v| !v.is_empty() && !v.contains('@'))
  }

  let company = match person_type {
    PersonType::Cnpj => usable(trade_name).or_else(|| usable(company_name)),
    PersonType::Cpf => None,
  };

  company
    .or_else(|| usable(name).and_then(|n| n.split_whitespace().next()))
    .unwrap_or(DISPLAY_NAME_FALLBACK)
    .to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_test::Token;

  #[test]
  fn test_serde_impl() {
    serde_test::assert_tokens(
      &Role::Client,
      &[Token::UnitVariant { name: "Role", variant: "CLIENT" }],
    );
    serde_test::assert_de_tokens(
      &Role::Professional,
      &[Token::UnitVariant { name: "Role", variant: "professional" }],
    );
    serde_test::assert_tokens(
      &PersonType::Cnpj,
      &[Token::UnitVariant { name: "PersonType", variant: "CNPJ" }],
    );
    serde_test::assert_de_tokens(
      &PersonType::Cpf,
      &[Token::UnitVariant { name: "PersonType", variant: "cpf" }],
    );
  }

  #[test]
  fn companies_use_trade_name_first() {
    let name = display_name(
      PersonType::Cnpj,
      None,
      Some("  Casa & Obra  "),
      Some("Casa e Obra Ltda"),
    );
    assert_eq!(name, "Casa & Obra");

    let name = display_name(PersonType::Cnpj, None, Some("  "), Some("Casa e Obra Ltda"));
    assert_eq!(name, "Casa e Obra Ltda");
  }

  #[test]
  fn people_use_their_first_name() {
    assert_eq!(
      display_name(PersonType::Cpf, Some(" Maria  da Silva"), Some("Ignored"), None),
      "Maria"
    );
  }

  #[test]
  fn falls_back_when_nothing_is_usable() {
    assert_eq!(display_name(PersonType::Cpf, None, None, None), DISPLAY_NAME_FALLBACK);
    assert_eq!(
      display_name(PersonType::Cpf, Some("maria@example.com"), None, None),
      DISPLAY_NAME_FALLBACK
    );
  }
}
