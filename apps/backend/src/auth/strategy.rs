//! Pluggable authentication strategies and their dispatcher.
//!
//! Each strategy resolves one credential shape to the uniform
//! [`AuthResult`]; callers never see strategy-specific shapes. The
//! registry is an explicit name → strategy map built once at startup and
//! carried in `AppState`; there is no global mutable dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::password::verify_password;
use crate::auth::token::{TokenCodec, TokenError, TokenPurpose};
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::repos::users::{self, User};
use crate::state::security_config::SecurityConfig;

/// Strategy names routes select by.
pub const PASSWORD_STRATEGY: &str = "password";
pub const BEARER_STRATEGY: &str = "bearer-token";

/// Credential shapes accepted by the strategies.
#[derive(Debug, Clone)]
pub enum Credentials {
    Password { email: String, password: String },
    Bearer { token: String },
}

/// Why an authentication attempt was rejected. Internal only: the HTTP
/// boundary renders every reason as the same generic 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NoSuchIdentity,
    BadCredential,
    MalformedToken,
    ExpiredToken,
    SignatureMismatch,
    PurposeMismatch,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NoSuchIdentity => "no_such_identity",
            RejectReason::BadCredential => "bad_credential",
            RejectReason::MalformedToken => "malformed_token",
            RejectReason::ExpiredToken => "expired_token",
            RejectReason::SignatureMismatch => "signature_mismatch",
            RejectReason::PurposeMismatch => "purpose_mismatch",
        }
    }
}

impl From<TokenError> for RejectReason {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Malformed => RejectReason::MalformedToken,
            TokenError::Expired => RejectReason::ExpiredToken,
            TokenError::SignatureMismatch => RejectReason::SignatureMismatch,
            TokenError::PurposeMismatch => RejectReason::PurposeMismatch,
        }
    }
}

/// Outcome of one authentication attempt. Store failures are not
/// rejections; they surface as `DomainError` on the `Err` path.
#[derive(Debug, Clone)]
pub enum AuthResult {
    Authenticated(User),
    Rejected(RejectReason),
}

/// A named, pluggable procedure for resolving credentials to an identity.
///
/// Adding an API-key or OAuth flow means one more implementation behind
/// the same registry; the dispatcher contract does not change.
#[async_trait]
pub trait AuthStrategy: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    async fn authenticate(
        &self,
        conn: &DatabaseConnection,
        credentials: &Credentials,
    ) -> Result<AuthResult, DomainError>;
}

/// Email + password verification against the credential store.
#[derive(Debug, Default)]
pub struct PasswordStrategy;

#[async_trait]
impl AuthStrategy for PasswordStrategy {
    fn name(&self) -> &'static str {
        PASSWORD_STRATEGY
    }

    async fn authenticate(
        &self,
        conn: &DatabaseConnection,
        credentials: &Credentials,
    ) -> Result<AuthResult, DomainError> {
        let (email, password) = match credentials {
            Credentials::Password { email, password } => (email, password),
            _ => {
                return Err(DomainError::validation(
                    "password strategy requires email/password credentials",
                ))
            }
        };

        let user = match users::find_by_email(conn, &email.trim().to_lowercase()).await? {
            Some(user) => user,
            None => return Ok(AuthResult::Rejected(RejectReason::NoSuchIdentity)),
        };

        // Argon2 verification is a deliberate slow path; keep it off the
        // async workers.
        let plaintext = password.clone();
        let stored = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&plaintext, &stored))
            .await
            .map_err(|e| {
                DomainError::infra(
                    InfraErrorKind::Other("blocking".to_string()),
                    format!("password verification task failed: {e}"),
                )
            })?;

        if verified {
            Ok(AuthResult::Authenticated(user))
        } else {
            Ok(AuthResult::Rejected(RejectReason::BadCredential))
        }
    }
}

/// Stateless session binding: the bearer token is the credential,
/// re-verified on every request.
#[derive(Debug)]
pub struct BearerStrategy {
    codec: TokenCodec,
}

impl BearerStrategy {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }
}

#[async_trait]
impl AuthStrategy for BearerStrategy {
    fn name(&self) -> &'static str {
        BEARER_STRATEGY
    }

    async fn authenticate(
        &self,
        conn: &DatabaseConnection,
        credentials: &Credentials,
    ) -> Result<AuthResult, DomainError> {
        let token = match credentials {
            Credentials::Bearer { token } => token,
            _ => {
                return Err(DomainError::validation(
                    "bearer strategy requires a token credential",
                ))
            }
        };

        let claims = match self.codec.verify(token, TokenPurpose::Session) {
            Ok(claims) => claims,
            Err(e) => return Ok(AuthResult::Rejected(e.into())),
        };

        let subject = match Uuid::parse_str(&claims.sub) {
            Ok(subject) => subject,
            Err(_) => return Ok(AuthResult::Rejected(RejectReason::MalformedToken)),
        };

        // A deleted account may still hold a cryptographically valid token.
        match users::find_by_id(conn, subject).await? {
            Some(user) => Ok(AuthResult::Authenticated(user)),
            None => Ok(AuthResult::Rejected(RejectReason::NoSuchIdentity)),
        }
    }
}

/// Explicit strategy map, constructed once at process start.
#[derive(Debug)]
pub struct AuthRegistry {
    strategies: HashMap<&'static str, Arc<dyn AuthStrategy>>,
}

impl AuthRegistry {
    /// Build the registry with the default strategy set.
    pub fn new(security: &SecurityConfig) -> Self {
        let mut strategies: HashMap<&'static str, Arc<dyn AuthStrategy>> = HashMap::new();

        let password: Arc<dyn AuthStrategy> = Arc::new(PasswordStrategy);
        let bearer: Arc<dyn AuthStrategy> =
            Arc::new(BearerStrategy::new(TokenCodec::new(security.clone())));

        strategies.insert(password.name(), password);
        strategies.insert(bearer.name(), bearer);

        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.strategies.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch an authentication attempt to the named strategy.
    ///
    /// An unknown strategy name is a wiring bug, not a credential
    /// rejection, and surfaces as an infra error.
    pub async fn authenticate(
        &self,
        strategy: &str,
        conn: &DatabaseConnection,
        credentials: &Credentials,
    ) -> Result<AuthResult, DomainError> {
        let strategy = self.strategies.get(strategy).ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::Other("auth".to_string()),
                format!("unknown authentication strategy '{strategy}'"),
            )
        })?;

        strategy.authenticate(conn, credentials).await
    }
}
