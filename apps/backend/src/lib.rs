#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod health;
pub mod infra;
pub mod logging;
pub mod mail;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::strategy::{
    AuthRegistry, AuthResult, AuthStrategy, Credentials, RejectReason, BEARER_STRATEGY,
    PASSWORD_STRATEGY,
};
pub use auth::token::{Claims, TokenCodec, TokenError, TokenPurpose};
pub use config::db::{db_url, DbOwner, DbProfile};
pub use error::AppError;
pub use extractors::{AdminUser, AuthToken, CurrentUser};
pub use infra::db::{bootstrap_db, connect_db};
pub use infra::state::build_state;
pub use middleware::{cors_middleware, RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan};
pub use state::{AppState, SecurityConfig};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::test_logging::init();
}
