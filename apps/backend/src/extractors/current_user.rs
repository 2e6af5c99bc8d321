//! Stateless session binding.
//!
//! The bearer token is the credential, re-verified on every request via
//! the `bearer-token` strategy. On success the resolved identity (minus
//! the password hash) is bound to the request; on rejection the request
//! short-circuits with the single generic 401 while the specific reason
//! goes to the security log.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::strategy::{AuthResult, Credentials, BEARER_STRATEGY};
use crate::error::AppError;
use crate::extractors::auth_token::bearer_from_request;
use crate::logging::security;
use crate::repos::users::{Role, User};
use crate::state::app_state::AppState;

/// The identity bound to an authenticated request. Deliberately omits the
/// password hash.
#[derive(Debug, Serialize, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_admin: bool,
    pub mobile: Option<String>,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            role: user.role,
            is_admin: user.is_admin,
            mobile: user.mobile,
        }
    }
}

/// Run the bearer strategy for this request and return the full domain
/// identity. Shared by [`CurrentUser`] and the admin gate so the
/// authorization predicate can see the identity before it is stripped.
pub(crate) async fn resolve_identity(req: &HttpRequest) -> Result<User, AppError> {
    let token = bearer_from_request(req)?;

    let app_state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;
    let db = app_state.require_db()?;

    let credentials = Credentials::Bearer { token };
    let result = app_state
        .auth
        .authenticate(BEARER_STRATEGY, db, &credentials)
        .await?;

    match result {
        AuthResult::Authenticated(user) => Ok(user),
        AuthResult::Rejected(reason) => {
            security::auth_failed(BEARER_STRATEGY, reason.as_str(), None);
            Err(AppError::unauthorized())
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let user = resolve_identity(&req).await?;
            Ok(CurrentUser::from(user))
        })
    }
}
