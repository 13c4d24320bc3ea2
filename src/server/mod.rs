//! HTTP surface: landing page, health and prediction endpoints.

mod error;
pub mod handlers;

pub use error::ApiError;
pub use handlers::PredictResponse;

use crate::inference::ModelState;
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::info;

/// Largest `/predict` body accepted when no [`BodyLimit`] is registered.
pub const DEFAULT_BODY_LIMIT: usize = 32 * 1024 * 1024;

/// Upper bound on `/predict` body size, in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodyLimit(pub usize);

impl Default for BodyLimit {
    fn default() -> Self {
        Self(DEFAULT_BODY_LIMIT)
    }
}

/// Registers every route; shared by the server and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(handlers::index)))
        .service(web::resource("/static/js/app.js").route(web::get().to(handlers::app_js)))
        .service(web::resource("/health").route(web::get().to(handlers::health)))
        .service(web::resource("/predict").route(web::post().to(handlers::predict)));
}

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
}

/// Serves `state` until the process is stopped.
pub async fn run(
    state: ModelState,
    host: &str,
    port: u16,
    body_limit: BodyLimit,
) -> std::io::Result<()> {
    let data = web::Data::new(state);
    let limit = web::Data::new(body_limit);
    info!(host, port, body_limit = body_limit.0, "server listening");

    HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .app_data(data.clone())
            .app_data(limit.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run()
    .await
}
