use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::auth::strategy::AuthRegistry;
use crate::error::AppError;
use crate::mail::{LogMailer, PasswordResetMailer};

/// Application state containing shared resources.
///
/// Built once at startup; the strategy registry and security config are
/// read-only from then on.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Security configuration including per-purpose token secrets
    pub security: SecurityConfig,
    /// Name → strategy map for authentication dispatch
    pub auth: Arc<AuthRegistry>,
    /// Password-reset delivery collaborator
    pub mailer: Arc<dyn PasswordResetMailer>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        security: SecurityConfig,
        mailer: Arc<dyn PasswordResetMailer>,
    ) -> Self {
        let auth = Arc::new(AuthRegistry::new(&security));
        Self {
            db: Some(db),
            security,
            auth,
            mailer,
        }
    }

    /// Create an AppState without a database connection (for testing).
    pub fn without_db(security: SecurityConfig, mailer: Arc<dyn PasswordResetMailer>) -> Self {
        let auth = Arc::new(AuthRegistry::new(&security));
        Self {
            db: None,
            security,
            auth,
            mailer,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    /// The database connection, or a 503-class error when the state was
    /// built without one.
    pub fn require_db(&self) -> Result<&DatabaseConnection, AppError> {
        self.db
            .as_ref()
            .ok_or_else(|| AppError::db_unavailable("Database connection not available"))
    }

    /// Default development mailer, used when no transport is wired in.
    pub fn default_mailer() -> Arc<dyn PasswordResetMailer> {
        let base_url = std::env::var("FRONTEND_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        Arc::new(LogMailer::new(base_url))
    }
}
