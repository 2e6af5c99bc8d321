//! Problem Details test helpers
//!
//! Assertions for the stable error contract without depending on backend
//! types: every error response is `application/problem+json` with a
//! SCREAMING_SNAKE_CASE code and trace-id parity between body and header.

use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Local mirror of the backend's ProblemDetails wire shape.
#[derive(Debug, Deserialize, Serialize)]
struct ProblemDetailsLike {
    #[serde(rename = "type")]
    type_: String,
    title: String,
    status: u16,
    detail: String,
    code: String,
    trace_id: String,
}

/// Assert that raw response parts conform to the stable error contract:
/// - HTTP status matches expected
/// - body parses as Problem Details
/// - `x-trace-id` header exists and matches the body `trace_id`
/// - `code` matches and is SCREAMING_SNAKE_CASE
pub fn assert_problem_details(
    status: StatusCode,
    headers: &HeaderMap,
    body_bytes: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
) -> String {
    assert_eq!(status, expected_status);

    let body_str =
        String::from_utf8(body_bytes.to_vec()).expect("Response body should be valid UTF-8");
    let problem: ProblemDetailsLike =
        serde_json::from_str(&body_str).expect("Response body should be valid ProblemDetails JSON");

    let trace_id_header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");

    assert_eq!(
        problem.trace_id, trace_id_header,
        "trace_id in body should match x-trace-id header"
    );

    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());
    assert!(
        problem
            .code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c == '_'),
        "code should be SCREAMING_SNAKE_CASE, got '{}'",
        problem.code
    );

    problem.detail
}
