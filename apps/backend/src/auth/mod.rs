//! Authentication & authorization core: password hashing, the token
//! codec, pluggable strategies, and the role gate.

pub mod authorize;
pub mod password;
pub mod strategy;
pub mod token;

pub use authorize::{require_role, role_allows};
pub use strategy::{
    AuthRegistry, AuthResult, AuthStrategy, Credentials, RejectReason, BEARER_STRATEGY,
    PASSWORD_STRATEGY,
};
pub use token::{Claims, TokenCodec, TokenError, TokenPurpose};
