//! Role-based authorization gate.
//!
//! A pure predicate over (identity, required role), kept free of HTTP and
//! store concerns so a richer policy engine can replace it without
//! touching call sites. Denial is 403: 401 is reserved for missing or
//! invalid identity.

use crate::error::AppError;
use crate::logging::security;
use crate::repos::users::{Role, User};

/// Exact role match, or the `is_admin` flag overrides.
pub fn role_allows(user: &User, required: Role) -> bool {
    user.is_admin || user.role == required
}

/// Evaluate the gate, logging the denial. Never a silent pass-through.
pub fn require_role(user: &User, required: Role) -> Result<(), AppError> {
    if role_allows(user, required) {
        Ok(())
    } else {
        security::role_denied(&user.id.to_string(), required.as_str());
        Err(AppError::forbidden())
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::{require_role, role_allows};
    use crate::repos::users::{Role, User};

    fn user(role: Role, is_admin: bool) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            username: "testuser".to_string(),
            email: "test@example.test".to_string(),
            password_hash: String::new(),
            role,
            is_admin,
            mobile: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn customer_denied_admin() {
        assert!(!role_allows(&user(Role::Customer, false), Role::Admin));
    }

    #[test]
    fn is_admin_overrides_role_string() {
        // Even with role "customer", the admin flag wins.
        assert!(role_allows(&user(Role::Customer, true), Role::Admin));
    }

    #[test]
    fn exact_role_match_allows() {
        assert!(role_allows(&user(Role::Customer, false), Role::Customer));
        assert!(role_allows(&user(Role::Admin, true), Role::Admin));
    }

    #[test]
    fn denial_is_forbidden_not_unauthorized() {
        let err = require_role(&user(Role::Customer, false), Role::Admin).unwrap_err();
        assert_eq!(err.status(), actix_web::http::StatusCode::FORBIDDEN);
    }
}
