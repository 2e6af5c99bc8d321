//! Signed bearer-token codec.
//!
//! Tokens are compact HS256 JWTs (header.claims.signature) carrying the
//! subject id, a purpose tag, and a unique `jti` per issuance. Each
//! purpose signs with its own secret, so rotating one purpose's secret
//! invalidates only that purpose's outstanding tokens.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::state::security_config::SecurityConfig;

/// Session tokens live 30 days, reset tokens 1 hour.
const SESSION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);
const PASSWORD_RESET_TTL: Duration = Duration::from_secs(60 * 60);

/// What a token vouches for. A token of one purpose is never accepted
/// where the other is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    Session,
    PasswordReset,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Session => "session",
            TokenPurpose::PasswordReset => "password_reset",
        }
    }

    fn ttl(&self) -> Duration {
        match self {
            TokenPurpose::Session => SESSION_TTL,
            TokenPurpose::PasswordReset => PASSWORD_RESET_TTL,
        }
    }
}

/// Claims carried by every issued token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the user id the token vouches for
    pub sub: String,
    /// Purpose tag, `session` or `password_reset`
    pub purpose: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Unique id per issuance, for audit correlation
    pub jti: String,
}

/// Why a token was rejected. Collapsed to one generic 401 on the wire;
/// kept specific here for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Malformed,
    Expired,
    SignatureMismatch,
    PurposeMismatch,
}

impl TokenError {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed_token",
            TokenError::Expired => "expired_token",
            TokenError::SignatureMismatch => "signature_mismatch",
            TokenError::PurposeMismatch => "purpose_mismatch",
        }
    }
}

/// Issues and verifies purpose-tagged tokens against the process-wide
/// security configuration.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    security: SecurityConfig,
}

impl TokenCodec {
    pub fn new(security: SecurityConfig) -> Self {
        Self { security }
    }

    fn secret_for(&self, purpose: TokenPurpose) -> &[u8] {
        match purpose {
            TokenPurpose::Session => &self.security.jwt_secret,
            TokenPurpose::PasswordReset => &self.security.reset_secret,
        }
    }

    /// Issue a token for `subject` with the purpose's configured lifetime.
    pub fn issue(&self, subject: Uuid, purpose: TokenPurpose) -> Result<String, DomainError> {
        self.issue_at(subject, purpose, SystemTime::now())
    }

    /// Issue a token as if the current time were `now`. Production code
    /// goes through [`TokenCodec::issue`]; tests use this to mint tokens
    /// that are already expired.
    pub fn issue_at(
        &self,
        subject: Uuid,
        purpose: TokenPurpose,
        now: SystemTime,
    ) -> Result<String, DomainError> {
        let iat = now
            .duration_since(UNIX_EPOCH)
            .map_err(|_| {
                DomainError::infra(
                    InfraErrorKind::Other("clock".to_string()),
                    "system time before Unix epoch",
                )
            })?
            .as_secs() as i64;

        let exp = iat + purpose.ttl().as_secs() as i64;

        let claims = Claims {
            sub: subject.to_string(),
            purpose: purpose.as_str().to_string(),
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::new(self.security.algorithm),
            &claims,
            &EncodingKey::from_secret(self.secret_for(purpose)),
        )
        .map_err(|e| {
            DomainError::infra(
                InfraErrorKind::Other("jwt".to_string()),
                format!("failed to encode token: {e}"),
            )
        })
    }

    /// Verify a token against the expected purpose's secret.
    ///
    /// Signature integrity and expiry are checked by the decoder before
    /// any claim is trusted; the purpose tag is compared afterwards, so a
    /// reset token is rejected where a session is required even when both
    /// purposes are configured with the same secret.
    pub fn verify(&self, token: &str, expected: TokenPurpose) -> Result<Claims, TokenError> {
        // Default Validation already checks exp; pin the configured algorithm.
        let validation = Validation::new(self.security.algorithm);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_for(expected)),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
            _ => TokenError::Malformed,
        })?;

        if data.claims.purpose != expected.as_str() {
            return Err(TokenError::PurposeMismatch);
        }

        Ok(data.claims)
    }
}
