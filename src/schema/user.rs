use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{types::Json, FromRow};
use validator::extras::only_digits;

use crate::{
  database::{error::ErrorExt, Connection, Result},
  types::{
    display_name,
    form::users::{login, profile::Profile, register, update},
    id::{marker::UserMarker, Id},
    validation::{normalize_email, normalize_services, parse_date, trimmed},
    PersonType, Role,
  },
  util::Sensitive,
};

#[derive(Debug, Clone, FromRow)]
pub struct User {
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
  pub cnpj_card: Option<String>,
  pub email: String,
  pub phone: String,
  pub services: Option<Json<Vec<String>>>,
  pub password_hash: String,
  pub created_at: NaiveDateTime,
  pub updated_at: NaiveDateTime,
}

impl User {
  #[tracing::instrument(skip(conn))]
  pub async fn by_id(conn: &mut Connection, id: Id<UserMarker>) -> Result<Option<Self>> {
    sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = ?")
      .bind(id)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip_all)]
  pub async fn by_email(conn: &mut Connection, email: &str) -> Result<Option<Self>> {
    sqlx::query_as::<_, Self>("SELECT * FROM users WHERE email = ?")
      .bind(email)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip_all)]
  pub async fn by_cpf(conn: &mut Connection, cpf: &str) -> Result<Option<Self>> {
    sqlx::query_as::<_, Self>("SELECT * FROM users WHERE cpf = ?")
      .bind(cpf)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip_all)]
  pub async fn by_cnpj(conn: &mut Connection, cnpj: &str) -> Result<Option<Self>> {
    sqlx::query_as::<_, Self>("SELECT * FROM users WHERE cnpj = ?")
      .bind(cnpj)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  /// Writes every mutable column back and refreshes `updated_at`.
  /// `name`, `cpf` and `cnpj` are never touched.
  #[tracing::instrument(skip_all, fields(id = %self.id))]
  pub async fn save(&self, conn: &mut Connection) -> Result<Self> {
    sqlx::query_as::<_, Self>(
      "UPDATE users SET \
        birth_date = ?, rg = ?, phone = ?, email = ?, \
        company_name = ?, trade_name = ?, \
        contact_name = ?, contact_email = ?, contact_phone = ?, \
        contact_cpf = ?, contact_rg = ?, contact_birth_date = ?, \
        services = ?, cnpj_card = ?, password_hash = ?, \
        updated_at = CURRENT_TIMESTAMP \
      WHERE id = ? RETURNING *",
    )
    .bind(self.birth_date)
    .bind(&self.rg)
    .bind(&self.phone)
    .bind(&self.email)
    .bind(&self.company_name)
    .bind(&self.trade_name)
    .bind(&self.contact_name)
    .bind(&self.contact_email)
    .bind(&self.contact_phone)
    .bind(&self.contact_cpf)
    .bind(&self.contact_rg)
    .bind(self.contact_birth_date)
    .bind(&self.services)
    .bind(&self.cnpj_card)
    .bind(&self.password_hash)
    .bind(self.id)
    .fetch_one(conn)
    .await
    .into_db_error()
  }
}

impl User {
  #[must_use]
  pub fn display_name(&self) -> String {
    display_name(
      self.person_type,
      self.name.as_deref(),
      self.trade_name.as_deref(),
      self.company_name.as_deref(),
    )
  }

  #[must_use]
  pub fn services(&self) -> &[String] {
    self.services.as_ref().map_or(&[], |s| s.0.as_slice())
  }

  /// Merges a validated profile update. Blank values clear optional
  /// text fields, but never the e-mail, phone numbers, CPF or dates.
  pub fn apply_update(&mut self, form: &update::Request) {
    fn text(target: &mut Option<String>, value: Option<&str>) {
      if value.is_some() {
        *target = trimmed(value);
      }
    }

    fn keep_unless_blank<T>(target: &mut T, value: Option<T>) {
      if let Some(value) = value {
        *target = value;
      }
    }

    keep_unless_blank(
      &mut self.birth_date,
      form.birth_date.as_deref().and_then(parse_date).map(Some),
    );
    keep_unless_blank(
      &mut self.contact_birth_date,
      form.contact_birth_date.as_deref().and_then(parse_date).map(Some),
    );
    keep_unless_blank(&mut self.phone, digits(form.phone.as_deref()));
    keep_unless_blank(&mut self.email, email(form.email.as_deref()));
    keep_unless_blank(
      &mut self.contact_phone,
      digits(form.contact_phone.as_deref()).map(Some),
    );
    keep_unless_blank(
      &mut self.contact_cpf,
      digits(form.contact_cpf.as_ref().map(Sensitive::as_str)).map(Some),
    );
    keep_unless_blank(
      &mut self.cnpj_card,
      trimmed(form.cnpj_card.as_ref().map(Sensitive::as_str)).map(Some),
    );

    text(&mut self.rg, form.rg.as_ref().map(Sensitive::as_str));
    text(&mut self.company_name, form.company_name.as_deref());
    text(&mut self.trade_name, form.trade_name.as_deref());
    text(&mut self.contact_name, form.contact_name.as_deref());
    text(&mut self.contact_rg, form.contact_rg.as_ref().map(Sensitive::as_str));

    if let Some(contact_email) = form.contact_email.as_deref() {
      self.contact_email = email(Some(contact_email));
    }

    if let Some(services) = form.services.as_deref() {
      self.services = services_column(services);
    }
  }

  #[must_use]
  pub fn to_profile(&self) -> Profile {
    Profile {
      id: self.id,
      role: self.role,
      person_type: self.person_type,
      name: self.name.clone(),
      birth_date: self.birth_date,
      cpf: self.cpf.clone(),
      rg: self.rg.clone(),
      cnpj: self.cnpj.clone(),
      company_name: self.company_name.clone(),
      trade_name: self.trade_name.clone(),
      contact_name: self.contact_name.clone(),
      contact_email: self.contact_email.clone(),
      contact_phone: self.contact_phone.clone(),
      contact_cpf: self.contact_cpf.clone(),
      contact_rg: self.contact_rg.clone(),
      contact_birth_date: self.contact_birth_date,
      email: self.email.clone(),
      phone: self.phone.clone(),
      services: self.services().to_vec(),
      has_cnpj_card: self.cnpj_card.is_some(),
      display_name: self.display_name(),
      created_at: self.created_at,
      updated_at: self.updated_at,
    }
  }

  #[must_use]
  pub fn to_login_response(&self) -> login::Response {
    login::Response {
      id: self.id,
      role: self.role,
      person_type: self.person_type,
      name: self.name.clone(),
      trade_name: self.trade_name.clone(),
      company_name: self.company_name.clone(),
      email: self.email.clone(),
      display_name: self.display_name(),
    }
  }
}

fn digits(value: Option<&str>) -> Option<String> {
  value.map(only_digits).filter(|v| !v.is_empty())
}

fn email(value: Option<&str>) -> Option<String> {
  value.map(normalize_email).filter(|v| !v.is_empty())
}

fn services_column(services: &[String]) -> Option<Json<Vec<String>>> {
  let services = normalize_services(services);
  (!services.is_empty()).then_some(Json(services))
}

/// A validated, normalized signup ready to be inserted.
#[derive(Debug)]
pub struct NewUser {
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
  pub cnpj_card: Option<String>,
  pub email: String,
  pub phone: String,
  pub services: Option<Json<Vec<String>>>,
}

impl NewUser {
  /// Normalizes a signup form. Returns `None` if the form does not
  /// say which kind of account it is for.
  #[must_use]
  pub fn from_form(form: &register::Request) -> Option<Self> {
    let (role, person_type) = (form.role?, form.person_type?);
    let date = |value: &Option<String>| value.as_deref().and_then(parse_date);
    fn secret(value: Option<&Sensitive<String>>) -> Option<&str> {
      value.map(Sensitive::as_str)
    }

    Some(Self {
      role,
      person_type,
      name: trimmed(form.name.as_deref()),
      birth_date: date(&form.birth_date),
      cpf: digits(secret(form.cpf.as_ref())),
      rg: trimmed(secret(form.rg.as_ref())),
      cnpj: digits(form.cnpj.as_deref()),
      company_name: trimmed(form.company_name.as_deref()),
      trade_name: trimmed(form.trade_name.as_deref()),
      contact_name: trimmed(form.contact_name.as_deref()),
      contact_email: email(form.contact_email.as_deref()),
      contact_phone: digits(form.contact_phone.as_deref()),
      contact_cpf: digits(secret(form.contact_cpf.as_ref())),
      contact_rg: trimmed(secret(form.contact_rg.as_ref())),
      contact_birth_date: date(&form.contact_birth_date),
      cnpj_card: trimmed(secret(form.cnpj_card.as_ref())),
      email: email(form.email.as_deref()).unwrap_or_default(),
      phone: digits(form.phone.as_deref()).unwrap_or_default(),
      services: services_column(form.services.as_deref().unwrap_or_default()),
    })
  }

  #[tracing::instrument(skip_all, fields(role = %self.role, person_type = %self.person_type))]
  pub async fn insert(&self, conn: &mut Connection, password_hash: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
      "INSERT INTO users (\
        role, person_type, name, birth_date, cpf, rg, cnpj, \
        company_name, trade_name, contact_name, contact_email, contact_phone, \
        contact_cpf, contact_rg, contact_birth_date, cnpj_card, \
        email, phone, services, password_hash\
      ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(self.role)
    .bind(self.person_type)
    .bind(&self.name)
    .bind(self.birth_date)
    .bind(&self.cpf)
    .bind(&self.rg)
    .bind(&self.cnpj)
    .bind(&self.company_name)
    .bind(&self.trade_name)
    .bind(&self.contact_name)
    .bind(&self.contact_email)
    .bind(&self.contact_phone)
    .bind(&self.contact_cpf)
    .bind(&self.contact_rg)
    .bind(self.contact_birth_date)
    .bind(&self.cnpj_card)
    .bind(&self.email)
    .bind(&self.phone)
    .bind(&self.services)
    .bind(password_hash)
    .fetch_one(conn)
    .await
    .into_db_error()
  }
}
