use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::errors::ErrorCode;

async fn health() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().body("ok"))
}

/// Deliberate failure endpoint so the error contract can be probed.
async fn health_with_error() -> Result<HttpResponse, AppError> {
    Err(AppError::invalid(
        ErrorCode::ValidationError,
        "Example failure",
    ))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/health/error", web::get().to(health_with_error));
}
