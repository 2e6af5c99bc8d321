use jsonwebtoken::Algorithm;

/// Configuration for token security settings.
///
/// Two independent secrets, one per token purpose: session tokens and
/// password-reset tokens never share signing material, so a leaked or
/// rotated reset secret leaves sessions intact (and vice versa).
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Secret for signing and verifying session tokens
    pub jwt_secret: Vec<u8>,
    /// Secret for signing and verifying password-reset tokens
    pub reset_secret: Vec<u8>,
    /// JWT algorithm to use (pinned to HS256)
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given per-purpose secrets.
    pub fn new(jwt_secret: impl Into<Vec<u8>>, reset_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            reset_secret: reset_secret.into(),
            algorithm: Algorithm::HS256,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(
            b"default_session_secret_for_tests_only".to_vec(),
            b"default_reset_secret_for_tests_only".to_vec(),
        )
    }
}
