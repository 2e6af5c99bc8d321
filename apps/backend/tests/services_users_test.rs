mod support;

use backend::auth::strategy::{AuthResult, Credentials, RejectReason};
use backend::errors::domain::DomainError;
use backend::repos::users as users_repo;
use backend::services::users::{self as users_service, NewUser, UserUpdate};
use backend::{BEARER_STRATEGY, PASSWORD_STRATEGY};
use support::build_test_state;

fn new_user(prefix: &str) -> NewUser {
    NewUser {
        name: "Service Test".to_string(),
        username: backend_test_support::unique_str(prefix),
        email: backend_test_support::unique_email(prefix),
        password: "secret1".to_string(),
        mobile: None,
    }
}

#[actix_web::test]
async fn password_strategy_reports_distinct_internal_reasons(
) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().unwrap();

    let input = new_user("dispatch");
    let email = input.email.clone();
    let user = users_service::register_user(db, input).await?;

    // Correct credential authenticates.
    let result = state
        .auth
        .authenticate(
            PASSWORD_STRATEGY,
            db,
            &Credentials::Password {
                email: email.clone(),
                password: "secret1".to_string(),
            },
        )
        .await?;
    match result {
        AuthResult::Authenticated(found) => assert_eq!(found.id, user.id),
        other => panic!("expected Authenticated, got {other:?}"),
    }

    // Wrong password: bad_credential, internally distinct from a missing
    // account even though the HTTP boundary collapses them.
    let result = state
        .auth
        .authenticate(
            PASSWORD_STRATEGY,
            db,
            &Credentials::Password {
                email,
                password: "wrong".to_string(),
            },
        )
        .await?;
    assert!(matches!(
        result,
        AuthResult::Rejected(RejectReason::BadCredential)
    ));

    // Unknown account.
    let result = state
        .auth
        .authenticate(
            PASSWORD_STRATEGY,
            db,
            &Credentials::Password {
                email: backend_test_support::unique_email("missing"),
                password: "secret1".to_string(),
            },
        )
        .await?;
    assert!(matches!(
        result,
        AuthResult::Rejected(RejectReason::NoSuchIdentity)
    ));

    Ok(())
}

#[actix_web::test]
async fn unknown_strategy_is_an_infra_error_not_a_rejection(
) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().unwrap();

    let err = state
        .auth
        .authenticate(
            "api-key",
            db,
            &Credentials::Bearer {
                token: "irrelevant".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Infra(_, _)));

    Ok(())
}

#[actix_web::test]
async fn credential_shape_mismatch_is_a_validation_error(
) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().unwrap();

    let err = state
        .auth
        .authenticate(
            BEARER_STRATEGY,
            db,
            &Credentials::Password {
                email: "a@b.test".to_string(),
                password: "secret1".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));

    Ok(())
}

#[actix_web::test]
async fn unrelated_update_never_rehashes() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().unwrap();

    let user = users_service::register_user(db, new_user("norehash")).await?;
    let hash_before = user.password_hash.clone();

    let updated = users_service::apply_update(
        db,
        user.id,
        UserUpdate {
            name: Some("New Name".to_string()),
            ..UserUpdate::default()
        },
    )
    .await?;

    // The stored value is still the original hash, not a hash of a hash.
    assert_eq!(updated.password_hash, hash_before);

    let updated = users_service::apply_update(
        db,
        user.id,
        UserUpdate {
            password: Some("different-secret".to_string()),
            ..UserUpdate::default()
        },
    )
    .await?;
    assert_ne!(updated.password_hash, hash_before);

    Ok(())
}

#[actix_web::test]
async fn save_is_last_write_wins() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().unwrap();

    let user = users_service::register_user(db, new_user("lww")).await?;

    let mut first = users_repo::find_by_id(db, user.id).await?.unwrap();
    let mut second = first.clone();

    first.name = "First Writer".to_string();
    users_repo::save(db, first).await?;

    second.name = "Second Writer".to_string();
    users_repo::save(db, second).await?;

    let current = users_repo::find_by_id(db, user.id).await?.unwrap();
    assert_eq!(current.name, "Second Writer");

    Ok(())
}
