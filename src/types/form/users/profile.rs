use crate::types::{
  id::{marker::UserMarker, Id},
  PersonType, Role,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Everything stored about a user except the password hash and the
/// uploaded CNPJ card, which is only reported as present or not.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
  pub id: Id<UserMarker>,
  pub role: Role,
  pub person_type: PersonType,
  pub name: Option<String>,
  pub birth_date: Option<NaiveDate>,
  pub cpf: Option<String>,
  pub rg: Option<String>,
  pub cnpj: Option<String>,
  pub company_name: Option<String>,
  pub trade_name: Option<String>,
  pub contact_name: Option<String>,
  pub contact_email: Option<String>,
  pub contact_phone: Option<String>,
  pub contact_cpf: Option<String>,
  pub contact_rg: Option<String>,
  pub contact_birth_date: Option<NaiveDate>,
  pub email: String,
  pub phone: String,
  pub services: Vec<String>,
  pub has_cnpj_card: bool,
  pub display_name: String,
  pub created_at: NaiveDateTime,
  pub updated_at: NaiveDateTime,
}
