mod support;

use actix_web::test;
use serde_json::json;
use support::{build_test_state, create_test_app, login_token, register_account};

#[actix_web::test]
async fn duplicate_email_is_a_typed_conflict() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let account = register_account(&app, "dup-email").await;

    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "name": "Someone Else",
            "username": backend_test_support::unique_str("other"),
            "email": account.email,
            "password": "secret1",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 409);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "EMAIL_TAKEN");

    Ok(())
}

#[actix_web::test]
async fn duplicate_username_is_a_typed_conflict() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let account = register_account(&app, "dup-name").await;

    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "name": "Someone Else",
            "username": account.username,
            "email": backend_test_support::unique_email("other"),
            "password": "secret1",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 409);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "USERNAME_TAKEN");

    Ok(())
}

#[actix_web::test]
async fn field_validation_rejects_bad_input() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    // Bad email shape.
    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "name": "Test",
            "username": backend_test_support::unique_str("v"),
            "email": "not-an-email",
            "password": "secret1",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_EMAIL");

    // Password below the minimum length.
    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "name": "Test",
            "username": backend_test_support::unique_str("v"),
            "email": backend_test_support::unique_email("v"),
            "password": "short",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_PASSWORD");

    // Missing name.
    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "username": backend_test_support::unique_str("v"),
            "email": backend_test_support::unique_email("v"),
            "password": "secret1",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    Ok(())
}

#[actix_web::test]
async fn email_is_stored_lowercased() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let email = backend_test_support::unique_email("mixed");
    let shouty = email.to_uppercase();

    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "name": "Mixed Case",
            "username": backend_test_support::unique_str("mixed"),
            "email": shouty,
            "password": "secret1",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], json!(email));

    // And the lowercase form is the login handle.
    login_token(&app, &email, "secret1").await;

    Ok(())
}
