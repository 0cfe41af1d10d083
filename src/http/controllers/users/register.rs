use actix_web::{
  web::{self, Json},
  HttpResponse,
};
use validator::{Validate, ValidateError};

use crate::{
  database::{self, error::ErrorExt, Connection},
  http::Error,
  schema::{NewUser, User},
  types::{self, form::users::register},
  util::password,
  App,
};

#[derive(Debug, thiserror::Error)]
#[error("{0} is already registered")]
struct AlreadyRegistered(&'static str);

#[tracing::instrument(skip(app))]
pub async fn register(
  app: web::Data<App>,
  form: Json<register::Request>,
) -> Result<HttpResponse, Error> {
  form.validate()?;

  let form = form.into_inner();
  let Some(new_user) = NewUser::from_form(&form) else {
    return Err(ValidateError::single("role", "Choose an account type.").into());
  };

  // Hashing is slow, keep it out of the write lock.
  let password = form.password.unwrap_or_default();
  let password_hash = password::hash_blocking(password).await?;

  let mut tx = app.db_write().await?;

  let taken = taken_field(&mut tx, &new_user).await?;
  if let Some(field) = taken {
    return Err(Error::from_context(
      types::Error::Conflict {
        field: field.to_string(),
      },
      AlreadyRegistered(field),
    ));
  }

  let user = new_user.insert(&mut tx, &password_hash).await?;
  tx.commit().await.into_db_error()?;

  tracing::info!(id = %user.id, role = %user.role, "registered a new user");

  Ok(HttpResponse::Created().json(register::Response {
    id: user.id,
    role: user.role,
    person_type: user.person_type,
  }))
}

/// First unique value of the signup that another account already
/// uses, checked in the order e-mail, CPF, CNPJ.
async fn taken_field(
  conn: &mut Connection,
  user: &NewUser,
) -> database::Result<Option<&'static str>> {
  if User::by_email(conn, &user.email).await?.is_some() {
    return Ok(Some("email"));
  }

  if let Some(cpf) = user.cpf.as_deref() {
    if User::by_cpf(conn, cpf).await?.is_some() {
      return Ok(Some("cpf"));
    }
  }

  if let Some(cnpj) = user.cnpj.as_deref() {
    if User::by_cnpj(conn, cnpj).await?.is_some() {
      return Ok(Some("cnpj"));
    }
  }

  Ok(None)
}
