//! User account operations: registration, profile updates, password
//! reset, and the admin management surface.
//!
//! Every mutation loads a fresh record and goes through one code path, so
//! the "re-hash only when the plaintext changed" invariant holds in a
//! single place instead of being duplicated per handler.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::auth::token::{TokenCodec, TokenPurpose};
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::repos::users::{self, Role, User};

/// Registration command.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub mobile: Option<String>,
}

/// Profile update command. Absent fields are left untouched; the password
/// field is the ONLY trigger for re-hashing.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password: Option<String>,
}

/// Hash a plaintext on the blocking pool; argon2 is a deliberate slow path.
async fn hash_on_blocking_pool(plaintext: String) -> Result<String, DomainError> {
    tokio::task::spawn_blocking(move || hash_password(&plaintext))
        .await
        .map_err(|e| {
            DomainError::infra(
                InfraErrorKind::Other("blocking".to_string()),
                format!("password hashing task failed: {e}"),
            )
        })?
}

/// Create a new customer account. The plaintext password is hashed once
/// here and discarded; unique email/username violations surface as typed
/// conflicts from the adapter layer.
pub async fn register_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new_user: NewUser,
) -> Result<User, DomainError> {
    let email = new_user.email.trim().to_lowercase();
    let password_hash = hash_on_blocking_pool(new_user.password).await?;

    let now = OffsetDateTime::now_utc();
    let user = User {
        id: Uuid::new_v4(),
        name: new_user.name.trim().to_string(),
        username: new_user.username.trim().to_string(),
        email,
        password_hash,
        role: Role::Customer,
        is_admin: false,
        mobile: new_user.mobile.filter(|m| !m.trim().is_empty()),
        created_at: now,
        updated_at: now,
    };

    let user = users::create(conn, user).await?;

    info!(
        user_id = %user.id,
        email = %Redacted(&user.email),
        "user registered"
    );

    Ok(user)
}

/// Apply an update command to a freshly loaded user.
///
/// This is the single mutation path: `password_hash` is recomputed here
/// iff the command carries a plaintext password, and nowhere else, so an
/// unrelated save can never re-hash an already-hashed value.
pub async fn apply_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    update: UserUpdate,
) -> Result<User, DomainError> {
    let mut user = users::find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, "User not found"))?;

    if let Some(name) = update.name.filter(|v| !v.trim().is_empty()) {
        user.name = name.trim().to_string();
    }
    if let Some(username) = update.username.filter(|v| !v.trim().is_empty()) {
        user.username = username.trim().to_string();
    }
    if let Some(email) = update.email.filter(|v| !v.trim().is_empty()) {
        user.email = email.trim().to_lowercase();
    }
    if let Some(mobile) = update.mobile {
        let mobile = mobile.trim().to_string();
        user.mobile = (!mobile.is_empty()).then_some(mobile);
    }

    let password_changed = update.password.is_some();
    if let Some(password) = update.password {
        user.password_hash = hash_on_blocking_pool(password).await?;
    }

    user.updated_at = OffsetDateTime::now_utc();
    let user = users::save(conn, user).await?;

    debug!(user_id = %user.id, password_changed, "user profile updated");

    Ok(user)
}

/// Issue a password-reset token for the account behind `email`, if any.
///
/// Returns `None` for unknown emails: the caller responds identically
/// either way, and only the security log records the miss.
pub async fn issue_password_reset<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    codec: &TokenCodec,
    email: &str,
) -> Result<Option<(User, String)>, DomainError> {
    let email = email.trim().to_lowercase();

    let user = match users::find_by_email(conn, &email).await? {
        Some(user) => user,
        None => {
            security::reset_for_unknown_email(&email);
            return Ok(None);
        }
    };

    let token = codec.issue(user.id, TokenPurpose::PasswordReset)?;

    info!(
        user_id = %user.id,
        email = %Redacted(&user.email),
        "password reset token issued"
    );

    Ok(Some((user, token)))
}

/// Set a new password for `user_id` through the single update path.
pub async fn reset_password<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    new_password: String,
) -> Result<User, DomainError> {
    let update = UserUpdate {
        password: Some(new_password),
        ..UserUpdate::default()
    };
    let user = apply_update(conn, user_id, update).await?;

    info!(user_id = %user.id, "password reset completed");

    Ok(user)
}

// ----- Admin management surface -----

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    page: u64,
    page_size: u64,
    search: Option<&str>,
) -> Result<(Vec<User>, u64), DomainError> {
    users::list(conn, page, page_size, search).await
}

pub async fn get_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
) -> Result<User, DomainError> {
    users::find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, "User not found"))
}

pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
) -> Result<(), DomainError> {
    let removed = users::delete(conn, user_id).await?;
    if !removed {
        return Err(DomainError::not_found(NotFoundKind::User, "User not found"));
    }

    info!(user_id = %user_id, "user removed");

    Ok(())
}

/// Change a user's role. The `is_admin` flag mirrors `role == admin` and
/// is set in the same update so the pair can never diverge.
pub async fn set_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    role: Role,
) -> Result<User, DomainError> {
    let mut user = users::find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, "User not found"))?;

    user.role = role;
    user.is_admin = role == Role::Admin;
    user.updated_at = OffsetDateTime::now_utc();

    let user = users::save(conn, user).await?;

    info!(user_id = %user.id, role = role.as_str(), "user role changed");

    Ok(user)
}
