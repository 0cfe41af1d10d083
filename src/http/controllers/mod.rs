use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::types::services::SERVICE_CATALOG;

pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      .route("/health", web::get().to(health))
      .route("/services", web::get().to(services))
      .route("/register", web::post().to(users::register))
      .route("/login", web::post().to(users::login))
      .service(
        web::resource("/user/{id}")
          .route(web::get().to(users::profile))
          .route(web::put().to(users::update)),
      ),
  );
}

pub async fn health() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "ok": true }))
}

/// Service categories professionals pick from when signing up.
pub async fn services() -> HttpResponse {
  HttpResponse::Ok().json(SERVICE_CATALOG)
}
