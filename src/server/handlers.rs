use crate::inference::{
    collect_texts, is_json_content_type, parse_body, ModelState, Prediction, RequestError,
};
use crate::server::{ApiError, BodyLimit, DEFAULT_BODY_LIMIT};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const APP_JS: &str = include_str!("../../static/js/app.js");

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<Prediction>,
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

pub async fn app_js() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(APP_JS)
}

pub async fn health(state: web::Data<ModelState>) -> HttpResponse {
    HttpResponse::Ok().json(state.health())
}

/// Reads the whole body, refusing more than `limit` bytes.
async fn read_body(payload: web::Payload, limit: usize) -> Result<web::Bytes, RequestError> {
    match payload.to_bytes_limited(limit).await {
        Ok(Ok(body)) => Ok(body),
        Ok(Err(e)) => Err(RequestError::Unreadable(e.to_string())),
        Err(_) => Err(RequestError::PayloadTooLarge { limit }),
    }
}

pub async fn predict(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<ModelState>,
) -> Result<HttpResponse, ApiError> {
    state.ensure_ready()?;

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    if !is_json_content_type(content_type) {
        return Err(RequestError::WrongContentType.into());
    }

    let limit = req
        .app_data::<web::Data<BodyLimit>>()
        .map_or(DEFAULT_BODY_LIMIT, |l| l.0);
    let body = read_body(payload, limit).await?;
    let value = parse_body(&body)?;
    let texts = collect_texts(&value)?;
    debug!(count = texts.len(), "predict request");

    let predictions = state.predict(&texts).map_err(|e| {
        error!(error = %e, "inference failed");
        e
    })?;
    Ok(HttpResponse::Ok().json(PredictResponse { predictions }))
}
