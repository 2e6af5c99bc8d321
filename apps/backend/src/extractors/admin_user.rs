//! Admin route gate: authentication then authorization, in that order.
//!
//! A missing or invalid token is 401; a valid identity without the admin
//! role is 403. The two are never conflated.

use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::auth::authorize::require_role;
use crate::error::AppError;
use crate::extractors::current_user::{resolve_identity, CurrentUser};
use crate::repos::users::Role;

/// An authenticated identity that passed the admin role gate.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let user = resolve_identity(&req).await?;
            require_role(&user, Role::Admin)?;
            Ok(AdminUser(CurrentUser::from(user)))
        })
    }
}
