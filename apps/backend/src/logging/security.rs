//! Security event logging.
//!
//! The HTTP boundary collapses every credential/token failure into one
//! generic 401; these helpers are where the specific internal reason is
//! retained, with PII redacted.

use tracing::warn;

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Log a security-relevant authentication failure event.
pub fn auth_failed(strategy: &str, reason: &str, email: Option<&str>) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_AUTH_FAILED",
        %trace_id,
        strategy,
        reason,
        email = %email.map(Redacted).unwrap_or(Redacted("")),
        "Authentication failure"
    );
}

/// Log a role-gate denial (authenticated identity lacking the required role).
pub fn role_denied(user_id: &str, required: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_ROLE_DENIED",
        %trace_id,
        user_id,
        required,
        "Authorization denied"
    );
}

/// Log a password-reset request for an email with no account behind it.
/// The HTTP response is indistinguishable from the success case.
pub fn reset_for_unknown_email(email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_RESET_UNKNOWN_EMAIL",
        %trace_id,
        email = %Redacted(email),
        "Password reset requested for unknown email"
    );
}
