use actix_cors::Cors;
use actix_web::{http::header, web, HttpServer};
use error_stack::{Result, ResultExt};
use tracing::info;
use tracing_actix_web::TracingLogger;

use crate::{config, App};

pub mod controllers;
pub mod error;
pub mod util;

pub use error::Error;

#[derive(Debug, thiserror::Error)]
#[error("Could not start the obraconecta server")]
pub struct StartServerError;

/// Registers the shared app state, the JSON extractor settings and
/// every route. Unknown paths answer with a JSON 404.
pub fn configure(app: App) -> impl FnOnce(&mut web::ServiceConfig) {
  move |cfg| {
    let json = web::JsonConfig::default()
      .limit(app.config.body_limit)
      .error_handler(util::handle_json_error);

    cfg
      .app_data(web::Data::new(app))
      .app_data(json)
      .configure(controllers::configure);
  }
}

/// Browser access is limited to the configured origins, `"*"`
/// allows any of them.
#[must_use]
pub fn cors(config: &config::Cors) -> Cors {
  let cors = Cors::default()
    .allowed_methods(["GET", "POST", "PUT", "OPTIONS"])
    .allowed_headers([header::CONTENT_TYPE, header::ACCEPT])
    .max_age(3600);

  if config.allowed_origins.iter().any(|o| o == "*") {
    return cors.allow_any_origin();
  }

  config
    .allowed_origins
    .iter()
    .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[tracing::instrument(skip_all, name = "server.run", fields(
  server.ip = %app.config.ip,
  server.port = %app.config.port,
  workers = %app.config.workers,
))]
pub async fn run(app: App) -> Result<(), StartServerError> {
  if app.db.is_readonly() {
    info!("Database is read-only, writes will be refused");
  }

  let address = app.config.address();
  let workers = app.config.workers.max(1);

  let server = HttpServer::new(move || {
    actix_web::App::new()
      .wrap(cors(&app.config.cors))
      .wrap(TracingLogger::<util::QuieterRootSpanBuilder>::new())
      .configure(configure(app.clone()))
      .default_service(web::to(util::not_found))
  })
  .workers(workers)
  .bind(address)
  .change_context(StartServerError)
  .attach_printable("could not bind server with address and port")?;

  for addr in server.addrs() {
    info!("obraconecta server is listening at http://{addr}");
  }

  server.run().await.change_context(StartServerError)
}
