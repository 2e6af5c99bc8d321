mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::assert_problem_details;
use support::{build_test_state, create_test_app};

#[actix_web::test]
async fn health_endpoint_is_plain_ok() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"ok");

    Ok(())
}

#[actix_web::test]
async fn error_responses_follow_the_problem_details_contract(
) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get().uri("/health/error").to_request();
    let resp = test::call_service(&app, req).await;

    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;

    let detail = assert_problem_details(
        status,
        &headers,
        &body,
        "VALIDATION_ERROR",
        StatusCode::BAD_REQUEST,
    );
    assert!(detail.contains("Example failure"));

    Ok(())
}

#[actix_web::test]
async fn malformed_json_body_renders_problem_details() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;

    assert_problem_details(status, &headers, &body, "BAD_REQUEST", StatusCode::BAD_REQUEST);

    Ok(())
}

#[actix_web::test]
async fn unauthorized_responses_share_the_contract() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get().uri("/api/users/profile").to_request();
    let resp = test::call_service(&app, req).await;

    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;

    let detail = assert_problem_details(
        status,
        &headers,
        &body,
        "UNAUTHORIZED",
        StatusCode::UNAUTHORIZED,
    );
    assert_eq!(detail, "Invalid credentials");

    Ok(())
}
