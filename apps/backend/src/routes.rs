use actix_web::web;

use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod users;

/// JSON extractor configuration: malformed bodies render the same Problem
/// Details contract as every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::BadRequest, err.to_string()).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(crate::health::configure_routes)
        .service(web::scope("/api/users").configure(users::configure_routes));
}
