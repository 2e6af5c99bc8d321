//! Password hashing with Argon2id.
//!
//! Output is a PHC string that self-describes its salt and parameters, so
//! verification needs only the stored hash. Hashing and verification are
//! deliberately slow; callers on the request path run them via
//! `tokio::task::spawn_blocking` so unrelated requests are not starved.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use tracing::warn;

use crate::errors::domain::{DomainError, InfraErrorKind};

/// Hash a plaintext password with a fresh random salt.
///
/// A primitive failure here is an infrastructure error, not a credential
/// problem, and is reported as such.
pub fn hash_password(plaintext: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::infra(InfraErrorKind::Hashing, format!("argon2 hash failed: {e}")))
}

/// Verify a plaintext password against a stored PHC hash in constant time.
///
/// Never errors outward: a malformed stored hash or a primitive failure
/// counts as a non-match. The distinction lives in the logs only, so the
/// user-facing result cannot be used as an oracle.
pub fn verify_password(plaintext: &str, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "stored password hash failed to parse; treating as non-match");
            return false;
        }
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}
