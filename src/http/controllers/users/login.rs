use actix_web::{
  web::{self, Json},
  HttpResponse,
};
use validator::Validate;

use crate::{
  http::Error,
  schema::User,
  types::{self, form::users::login, validation::normalize_email},
  util::password,
  App,
};

#[derive(Debug, thiserror::Error)]
#[error("Rejected login attempt")]
struct LoginRejected;

#[tracing::instrument(skip(app))]
pub async fn login(app: web::Data<App>, form: Json<login::Request>) -> Result<HttpResponse, Error> {
  form.validate()?;

  let form = form.into_inner();
  let email = normalize_email(&form.email);

  let mut conn = app.db_read().await?;
  let user = User::by_email(&mut conn, &email).await?;
  drop(conn);

  // unknown e-mails and wrong passwords are indistinguishable
  let Some(user) = user else {
    return Err(Error::from_context(types::Error::InvalidCredentials, LoginRejected));
  };

  if !password::verify_blocking(form.password, user.password_hash.clone()).await? {
    return Err(Error::from_context(types::Error::InvalidCredentials, LoginRejected));
  }

  Ok(HttpResponse::Ok().json(user.to_login_response()))
}
