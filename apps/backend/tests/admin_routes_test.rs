mod support;

use actix_web::test;
use backend::repos::users::{self as users_repo, Role};
use backend::services::users as users_service;
use serde_json::json;
use support::{build_test_state, create_test_app, login_token, register_account};
use uuid::Uuid;

#[actix_web::test]
async fn customer_is_denied_with_403() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let account = register_account(&app, "customer").await;
    let token = login_token(&app, &account.email, &account.password).await;

    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Authenticated but not authorized: 403, never 401.
    assert_eq!(resp.status().as_u16(), 403);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "FORBIDDEN");

    Ok(())
}

#[actix_web::test]
async fn admin_can_list_users_with_pagination() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().unwrap().clone();
    let app = create_test_app(state).with_prod_routes().build().await?;

    let admin = register_account(&app, "admin").await;
    users_service::set_role(&db, Uuid::parse_str(&admin.id)?, Role::Admin).await?;

    let other = register_account(&app, "listed").await;

    let token = login_token(&app, &admin.email, &admin.password).await;

    let req = test::TestRequest::get()
        .uri("/api/users?page=1&page_size=1")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 1);
    assert_eq!(body["total_users"], 2);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["users"].as_array().unwrap().len(), 1);

    // Case-insensitive search by email narrows to one account.
    let uri = format!("/api/users?search={}", other.email.to_uppercase());
    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["total_users"], 1);
    assert_eq!(body["users"][0]["email"], json!(other.email));

    Ok(())
}

#[actix_web::test]
async fn is_admin_flag_overrides_role_string() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().unwrap().clone();
    let app = create_test_app(state).with_prod_routes().build().await?;

    let account = register_account(&app, "override").await;

    // Force the pair to diverge: role stays customer, flag set by hand.
    let mut user = users_repo::find_by_id(&db, Uuid::parse_str(&account.id)?)
        .await?
        .unwrap();
    user.is_admin = true;
    users_repo::save(&db, user).await?;

    let token = login_token(&app, &account.email, &account.password).await;
    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    Ok(())
}

#[actix_web::test]
async fn role_endpoint_keeps_is_admin_mirrored() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().unwrap().clone();
    let app = create_test_app(state).with_prod_routes().build().await?;

    let admin = register_account(&app, "root").await;
    users_service::set_role(&db, Uuid::parse_str(&admin.id)?, Role::Admin).await?;
    let token = login_token(&app, &admin.email, &admin.password).await;

    let target = register_account(&app, "promote").await;

    let uri = format!("/api/users/{}/role", target.id);
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "role": "admin" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["role"], "admin");
    assert_eq!(body["is_admin"], true);

    // And back down again.
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "role": "customer" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["role"], "customer");
    assert_eq!(body["is_admin"], false);

    // Unknown role values are a typed 400.
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "role": "superuser" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_ROLE");

    Ok(())
}

#[actix_web::test]
async fn admin_get_and_delete_user() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().unwrap().clone();
    let app = create_test_app(state).with_prod_routes().build().await?;

    let admin = register_account(&app, "janitor").await;
    users_service::set_role(&db, Uuid::parse_str(&admin.id)?, Role::Admin).await?;
    let token = login_token(&app, &admin.email, &admin.password).await;

    let target = register_account(&app, "target").await;

    // Fetch by id.
    let uri = format!("/api/users/{}", target.id);
    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], json!(target.email));

    // Delete, then the record is gone.
    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "USER_NOT_FOUND");

    // Malformed ids are a typed 400, not a 404.
    let req = test::TestRequest::get()
        .uri("/api/users/not-a-uuid")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_USER_ID");

    Ok(())
}
