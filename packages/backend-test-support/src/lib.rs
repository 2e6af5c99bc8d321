//! Backend test support utilities
//!
//! This crate provides utilities specifically for backend testing:
//! unique test-data generators, assertions for the stable Problem Details
//! error contract, and unified logging initialization.

pub mod problem_details;
pub mod test_logging;
pub mod unique_helpers;

pub use problem_details::assert_problem_details;
pub use unique_helpers::{unique_email, unique_str};
