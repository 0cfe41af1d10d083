use actix_web::{
  web::{self, Json},
  HttpResponse,
};
use validator::{Validate, ValidateError};

use crate::{
  database::error::ErrorExt,
  http::Error,
  schema::User,
  types::{
    self,
    form::users::update,
    validation::{normalize_email, trimmed},
    PersonType,
  },
  util::{password, Sensitive},
  App,
};

#[derive(Debug, thiserror::Error)]
#[error("E-mail address belongs to another user")]
struct EmailTaken;

#[tracing::instrument(skip(app))]
pub async fn update(
  app: web::Data<App>,
  path: web::Path<String>,
  form: Json<update::Request>,
) -> Result<HttpResponse, Error> {
  let id = super::parse_user_id(&path)?;
  form.validate()?;

  let form = form.into_inner();
  let password_hash = match form.password.clone() {
    Some(password) => Some(password::hash_blocking(password).await?),
    None => None,
  };

  let mut tx = app.db_write().await?;

  let Some(mut user) = User::by_id(&mut tx, id).await? else {
    return Err(super::user_not_found(id));
  };

  let email = form.email.as_deref().map(normalize_email);
  if let Some(email) = email.filter(|e| !e.is_empty() && *e != user.email) {
    if User::by_email(&mut tx, &email).await?.is_some() {
      return Err(Error::from_context(
        types::Error::Conflict {
          field: "email".into(),
        },
        EmailTaken,
      ));
    }
  }

  if user.person_type == PersonType::Cnpj && renames_company(&user, &form) {
    return Err(
      ValidateError::single(
        "cnpjCard",
        "Upload the updated CNPJ card when changing the company name.",
      )
      .into(),
    );
  }

  if let Some(password_hash) = password_hash {
    user.password_hash = password_hash;
  }

  user.apply_update(&form);
  let user = user.save(&mut tx).await?;
  tx.commit().await.into_db_error()?;

  Ok(HttpResponse::Ok().json(user.to_profile()))
}

/// The legal name is tied to the registration document, so it can
/// only change together with a new one.
fn renames_company(user: &User, form: &update::Request) -> bool {
  let Some(company_name) = form.company_name.as_deref() else {
    return false;
  };

  let new_card = trimmed(form.cnpj_card.as_ref().map(Sensitive::as_str));
  trimmed(Some(company_name)) != user.company_name && new_card.is_none()
}
