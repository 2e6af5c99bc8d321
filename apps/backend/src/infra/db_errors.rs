//! SeaORM -> DomainError translation helpers.
//!
//! Adapters convert `sea_orm::DbErr` into `crate::errors::domain::DomainError`
//! here; higher layers then map `DomainError` to `AppError` via `From`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::trace_ctx;

/// Extract table.column from SQLite "UNIQUE constraint failed: table.column"
/// error messages.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    let rest = error_msg
        .split_once("UNIQUE constraint failed: ")
        .map(|(_, rest)| rest)?;
    rest.split(|c: char| c.is_whitespace() || c == '"' || c == ',')
        .next()
        .filter(|s| !s.is_empty())
}

/// Map a violated unique constraint to a domain conflict.
///
/// Postgres reports the index name (from the migration); SQLite reports
/// table.column.
fn map_unique_violation(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    if error_msg.contains("users_email_key") {
        return Some((ConflictKind::UniqueEmail, "Email already registered"));
    }
    if error_msg.contains("users_username_key") {
        return Some((ConflictKind::UniqueUsername, "Username already taken"));
    }
    match extract_sqlite_table_column(error_msg) {
        Some("users.email") => Some((ConflictKind::UniqueEmail, "Email already registered")),
        Some("users.username") => Some((ConflictKind::UniqueUsername, "Username already taken")),
        _ => None,
    }
}

fn looks_unavailable(error_msg: &str) -> bool {
    let msg = error_msg.to_ascii_lowercase();
    msg.contains("connection refused")
        || msg.contains("connection reset")
        || msg.contains("pool timed out")
        || msg.contains("connection closed")
}

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
///
/// The raw message may embed user-supplied values, so it goes to the log
/// (keyed by trace id), never into the returned detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found");
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            error!(%trace_id, error = %error_msg, "database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if let Some((kind, detail)) = map_unique_violation(&error_msg) {
        warn!(%trace_id, conflict = ?kind, "unique constraint violation");
        return DomainError::conflict(kind, detail);
    }

    if looks_unavailable(&error_msg) {
        error!(%trace_id, error = %error_msg, "database unavailable");
        return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
    }

    error!(%trace_id, error = %error_msg, "unmapped database error");
    DomainError::infra(InfraErrorKind::Other("Db".into()), "Database operation failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_unique_email_maps_to_conflict() {
        let err = sea_orm::DbErr::Custom(
            "error returned from database: (code: 2067) UNIQUE constraint failed: users.email"
                .to_string(),
        );
        let mapped = map_db_err(err);
        assert_eq!(
            mapped,
            DomainError::conflict(ConflictKind::UniqueEmail, "Email already registered")
        );
    }

    #[test]
    fn postgres_unique_username_maps_to_conflict() {
        let err = sea_orm::DbErr::Custom(
            "duplicate key value violates unique constraint \"users_username_key\"".to_string(),
        );
        let mapped = map_db_err(err);
        assert_eq!(
            mapped,
            DomainError::conflict(ConflictKind::UniqueUsername, "Username already taken")
        );
    }

    #[test]
    fn record_not_found_maps_to_not_found() {
        let mapped = map_db_err(sea_orm::DbErr::RecordNotFound("users".to_string()));
        assert!(matches!(mapped, DomainError::NotFound(_, _)));
    }

    #[test]
    fn connection_refused_maps_to_unavailable() {
        let mapped = map_db_err(sea_orm::DbErr::Custom("Connection refused (os error 111)".into()));
        assert_eq!(
            mapped,
            DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable")
        );
    }

    #[test]
    fn unknown_errors_do_not_leak_detail() {
        let mapped = map_db_err(sea_orm::DbErr::Custom(
            "syntax error near 'alice@example.com'".into(),
        ));
        match mapped {
            DomainError::Infra(_, detail) => assert!(!detail.contains("alice@example.com")),
            other => panic!("expected infra error, got {other:?}"),
        }
    }
}
