//! Test helpers for generating unique test data
//!
//! Uses ULIDs to ensure test isolation and avoid unique-index conflicts
//! between test runs sharing a database.

use ulid::Ulid;

/// Generate a unique string with the given prefix, e.g. `user-01J...`.
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique email address with the given prefix.
///
/// The result is already lowercase, matching the backend's
/// stored-lowercased email convention.
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email1 = unique_email("test");
/// let email2 = unique_email("test");
/// assert_ne!(email1, email2);
/// assert!(email1.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new()).to_lowercase()
}
