//! Outbound mail collaborator.
//!
//! The core only needs the seam: hand an identity and a reset token to a
//! delivery implementation. Delivery is fire-and-forget with respect to
//! token issuance: a failure is reported to the caller but the token
//! stays issued.

use std::fmt;

use async_trait::async_trait;
use tracing::info;

use crate::errors::domain::DomainError;
use crate::logging::pii::Redacted;
use crate::repos::users::User;

#[async_trait]
pub trait PasswordResetMailer: Send + Sync + fmt::Debug {
    async fn send_password_reset(&self, user: &User, reset_token: &str)
        -> Result<(), DomainError>;
}

/// Development delivery: writes the reset link to the log instead of
/// sending mail. Deployments plug a real transport in behind the trait.
#[derive(Debug, Clone)]
pub struct LogMailer {
    base_url: String,
}

impl LogMailer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PasswordResetMailer for LogMailer {
    async fn send_password_reset(
        &self,
        user: &User,
        reset_token: &str,
    ) -> Result<(), DomainError> {
        let reset_link = format!("{}/reset-password/{}", self.base_url, reset_token);

        info!(
            user_id = %user.id,
            email = %Redacted(&user.email),
            %reset_link,
            "password reset link issued (development mailer)"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::{LogMailer, PasswordResetMailer};
    use crate::repos::users::{Role, User};

    #[tokio::test]
    async fn log_mailer_never_fails_delivery() {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            username: "test".to_string(),
            email: "test@example.test".to_string(),
            password_hash: String::new(),
            role: Role::Customer,
            is_admin: false,
            mobile: None,
            created_at: now,
            updated_at: now,
        };

        let mailer = LogMailer::new("http://localhost:3000");
        assert!(mailer.send_password_reset(&user, "token").await.is_ok());
    }
}
