//! Error codes for the storefront backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the storefront backend API.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string that
/// appears in HTTP responses. Authentication rejections deliberately share
/// the single `Unauthorized` code: the wire contract never distinguishes
/// "no such account" from "wrong password" or "expired token".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required or credentials rejected
    Unauthorized,
    /// Access denied (authenticated, but lacking the required role)
    Forbidden,

    // Request Validation
    /// Invalid email address
    InvalidEmail,
    /// Password fails the minimum requirements
    InvalidPassword,
    /// Invalid role value
    InvalidRole,
    /// Invalid user id in the request path
    InvalidUserId,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// User not found
    UserNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Email already registered
    EmailTaken,
    /// Username already registered
    UsernameTaken,
    /// General conflict error
    Conflict,

    // Infrastructure
    /// Database operation failed
    DbError,
    /// Database unreachable
    DbUnavailable,
    /// Password-reset mail could not be delivered
    MailDeliveryFailed,
    /// Configuration error
    ConfigError,
    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// The canonical wire string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::InvalidEmail => "INVALID_EMAIL",
            ErrorCode::InvalidPassword => "INVALID_PASSWORD",
            ErrorCode::InvalidRole => "INVALID_ROLE",
            ErrorCode::InvalidUserId => "INVALID_USER_ID",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::EmailTaken => "EMAIL_TAKEN",
            ErrorCode::UsernameTaken => "USERNAME_TAKEN",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::DbError => "DB_ERROR",
            ErrorCode::DbUnavailable => "DB_UNAVAILABLE",
            ErrorCode::MailDeliveryFailed => "MAIL_DELIVERY_FAILED",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::InternalError => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
