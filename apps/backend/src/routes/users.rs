//! User account routes: login, registration, profile, password reset,
//! and the admin management surface.
//!
//! All paths are relative to the `/api/users` scope. Credential routes
//! (login, reset) are wired separately in `main.rs` so they can sit
//! behind the stricter rate limiter.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::strategy::{AuthResult, Credentials, PASSWORD_STRATEGY};
use crate::auth::token::{TokenCodec, TokenPurpose};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::errors::ErrorCode;
use crate::extractors::{AdminUser, CurrentUser};
use crate::logging::security;
use crate::repos::users::{Role, User};
use crate::services::users::{self as users_service, NewUser, UserUpdate};
use crate::state::app_state::AppState;

const MIN_PASSWORD_LEN: usize = 6;

/// Public view of a user; the password hash never leaves the service.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub mobile: Option<String>,
    pub role: Role,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            mobile: user.mobile,
            role: user.role,
            is_admin: user.is_admin,
        }
    }
}

impl From<CurrentUser> for UserResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            mobile: user.mobile,
            role: user.role,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthenticatedResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
}

// ----- Validation helpers -----

fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !domain.contains('@')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AppError::bad_request(
            ErrorCode::InvalidEmail,
            "Invalid email format",
        ))
    }
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(
            ErrorCode::InvalidPassword,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
        ));
    }
    Ok(())
}

fn require_field(value: &str, message: &'static str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::bad_request(ErrorCode::ValidationError, message));
    }
    Ok(())
}

// ----- Login -----

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Authenticate with the password strategy and mint a session token.
/// Every rejection renders the same generic 401.
async fn login(
    req: web::Json<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    require_field(&req.email, "Email is required")?;
    require_field(&req.password, "Password is required")?;

    let db = app_state.require_db()?;

    let credentials = Credentials::Password {
        email: req.email.clone(),
        password: req.password.clone(),
    };

    match app_state
        .auth
        .authenticate(PASSWORD_STRATEGY, db, &credentials)
        .await?
    {
        AuthResult::Authenticated(user) => {
            let codec = TokenCodec::new(app_state.security.clone());
            let token = codec.issue(user.id, TokenPurpose::Session)?;

            Ok(HttpResponse::Ok().json(AuthenticatedResponse {
                user: user.into(),
                token,
            }))
        }
        AuthResult::Rejected(reason) => {
            security::auth_failed(PASSWORD_STRATEGY, reason.as_str(), Some(&req.email));
            Err(AppError::unauthorized())
        }
    }
}

// ----- Registration -----

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub mobile: Option<String>,
}

async fn register(
    req: web::Json<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    require_field(&req.name, "Name is required")?;
    require_field(&req.username, "Username is required")?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let db = app_state.require_db()?;

    let req = req.into_inner();
    let user = users_service::register_user(
        db,
        NewUser {
            name: req.name,
            username: req.username,
            email: req.email,
            password: req.password,
            mobile: req.mobile,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

// ----- Profile -----

async fn get_profile(user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[derive(Debug, Deserialize, Default)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password: Option<String>,
}

/// Update the bound identity through the single update path and return a
/// fresh session token with the new profile.
async fn update_profile(
    user: CurrentUser,
    req: web::Json<ProfileUpdateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if let Some(email) = req.email.as_deref() {
        validate_email(email)?;
    }
    if let Some(password) = req.password.as_deref() {
        validate_password(password)?;
    }

    let db = app_state.require_db()?;

    let req = req.into_inner();
    let updated = users_service::apply_update(
        db,
        user.id,
        UserUpdate {
            name: req.name,
            username: req.username,
            email: req.email,
            mobile: req.mobile,
            password: req.password,
        },
    )
    .await?;

    let codec = TokenCodec::new(app_state.security.clone());
    let token = codec.issue(updated.id, TokenPurpose::Session)?;

    Ok(HttpResponse::Ok().json(AuthenticatedResponse {
        user: updated.into(),
        token,
    }))
}

// ----- Password reset -----

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

/// Issue a reset token and hand it to the mail collaborator.
///
/// The response is identical whether or not the account exists; only the
/// security log records the difference. A delivery failure is reported,
/// but the issued token stays valid; there is nothing to roll back.
async fn request_password_reset(
    req: web::Json<ResetRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    validate_email(&req.email)?;

    let db = app_state.require_db()?;
    let codec = TokenCodec::new(app_state.security.clone());

    if let Some((user, token)) = users_service::issue_password_reset(db, &codec, &req.email).await?
    {
        app_state
            .mailer
            .send_password_reset(&user, &token)
            .await
            .map_err(|e| AppError::mail_delivery(e.to_string()))?;
    }

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "If the account exists, a password reset message has been sent".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ResetConfirmRequest {
    #[serde(default)]
    pub password: String,
}

/// Verify a reset token and set the new password.
///
/// Token failures (expired, tampered, wrong purpose, or a subject that no
/// longer exists) all collapse to the generic 401.
async fn confirm_password_reset(
    path: web::Path<String>,
    req: web::Json<ResetConfirmRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    validate_password(&req.password)?;

    let token = path.into_inner();
    let codec = TokenCodec::new(app_state.security.clone());

    let claims = codec
        .verify(&token, TokenPurpose::PasswordReset)
        .map_err(|e| {
            security::auth_failed("password-reset", e.as_str(), None);
            AppError::unauthorized()
        })?;

    let subject = Uuid::parse_str(&claims.sub).map_err(|_| {
        security::auth_failed("password-reset", "malformed_token", None);
        AppError::unauthorized()
    })?;

    let db = app_state.require_db()?;

    users_service::reset_password(db, subject, req.password.clone())
        .await
        .map_err(|e| match e {
            DomainError::NotFound(NotFoundKind::User, _) => {
                security::auth_failed("password-reset", "no_such_identity", None);
                AppError::unauthorized()
            }
            e => AppError::from(e),
        })?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Password reset successful".to_string(),
    }))
}

// ----- Admin management surface -----

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub page: u64,
    pub page_size: u64,
    pub total_users: u64,
    pub total_pages: u64,
}

async fn list_users(
    _admin: AdminUser,
    query: web::Query<ListUsersQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(10).clamp(1, 100);

    let db = app_state.require_db()?;

    let (users, total_users) =
        users_service::list_users(db, page, page_size, query.search.as_deref()).await?;

    let total_pages = total_users.div_ceil(page_size);

    Ok(HttpResponse::Ok().json(ListUsersResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        page,
        page_size,
        total_users,
        total_pages,
    }))
}

fn parse_user_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::bad_request(ErrorCode::InvalidUserId, "Invalid user id"))
}

async fn get_user_by_id(
    _admin: AdminUser,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = parse_user_id(&path.into_inner())?;
    let db = app_state.require_db()?;

    let user = users_service::get_user(db, user_id).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

async fn delete_user(
    _admin: AdminUser,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = parse_user_id(&path.into_inner())?;
    let db = app_state.require_db()?;

    users_service::delete_user(db, user_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User removed".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdateRequest {
    #[serde(default)]
    pub role: String,
}

async fn update_user_role(
    _admin: AdminUser,
    path: web::Path<String>,
    req: web::Json<RoleUpdateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = parse_user_id(&path.into_inner())?;

    let role = match req.role.as_str() {
        "customer" => Role::Customer,
        "admin" => Role::Admin,
        other => {
            return Err(AppError::bad_request(
                ErrorCode::InvalidRole,
                format!("Unknown role '{other}'"),
            ))
        }
    };

    let db = app_state.require_db()?;
    let user = users_service::set_role(db, user_id, role).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

// ----- Route wiring -----

/// Credential endpoints; `main.rs` puts these behind the 5/min limiter.
pub fn configure_credential_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/reset-password").route(web::post().to(request_password_reset)))
        .service(
            web::resource("/reset-password/{token}")
                .route(web::post().to(confirm_password_reset)),
        );
}

/// Account and admin endpoints. Registration order matters: literal
/// segments must land before the `{id}` catch-all.
pub fn configure_account_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(
            web::resource("/profile")
                .route(web::get().to(get_profile))
                .route(web::put().to(update_profile)),
        )
        .service(web::resource("").route(web::get().to(list_users)))
        .service(web::resource("/{id}/role").route(web::put().to(update_user_role)))
        .service(
            web::resource("/{id}")
                .route(web::get().to(get_user_by_id))
                .route(web::delete().to(delete_user)),
        );
}

/// Full route set (tests wire this without the rate limiter).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_credential_routes(cfg);
    configure_account_routes(cfg);
}
