use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::AppError;

/// Raw bearer token extracted from the Authorization header.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthToken {
    pub token: String,
}

/// Parse `Authorization: Bearer <token>`. Missing header, non-UTF8 value,
/// wrong scheme, and empty token all collapse to the same 401.
pub(crate) fn bearer_from_request(req: &HttpRequest) -> Result<String, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(AppError::unauthorized)?;

    let auth_value = auth_header.to_str().map_err(|_| AppError::unauthorized())?;

    let parts: Vec<&str> = auth_value.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(AppError::unauthorized());
    }

    let token = parts[1];
    if token.is_empty() {
        return Err(AppError::unauthorized());
    }

    Ok(token.to_string())
}

impl FromRequest for AuthToken {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = bearer_from_request(&req)?;
            Ok(AuthToken { token })
        })
    }
}
