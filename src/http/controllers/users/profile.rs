use actix_web::{web, HttpResponse};

use crate::{http::Error, schema::User, App};

#[tracing::instrument(skip(app))]
pub async fn profile(app: web::Data<App>, path: web::Path<String>) -> Result<HttpResponse, Error> {
  let id = super::parse_user_id(&path)?;

  let mut conn = app.db_read().await?;
  let Some(user) = User::by_id(&mut conn, id).await? else {
    return Err(super::user_not_found(id));
  };

  Ok(HttpResponse::Ok().json(user.to_profile()))
}
