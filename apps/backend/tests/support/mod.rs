#![allow(dead_code)]

//! Shared helpers for the integration suites: state construction against
//! the in-memory test profile, a test app builder mirroring the
//! production middleware stack, and HTTP-level account helpers.

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use backend::config::db::DbProfile;
use backend::infra::state::build_state;
use backend::middleware::request_trace::RequestTrace;
use backend::middleware::structured_logger::StructuredLogger;
use backend::middleware::trace_span::TraceSpan;
use backend::routes;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use backend::AppError;
use serde_json::json;

/// Type alias for route configuration functions
type RouteConfigFn = Box<dyn Fn(&mut web::ServiceConfig) + Send + Sync>;

/// Security config with fixed, distinct per-purpose secrets so suites can
/// mint their own tokens against the same state.
pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(
        "test_session_secret_for_testing_purposes_only".as_bytes(),
        "test_reset_secret_for_testing_purposes_only".as_bytes(),
    )
}

/// Build an AppState on the in-memory test profile; the bootstrap applies
/// migrations.
pub async fn build_test_state() -> Result<AppState, AppError> {
    build_state()
        .with_db(DbProfile::Test)
        .with_security(test_security())
        .build()
        .await
}

/// Builder for creating test Actix service instances
pub struct TestAppBuilder {
    state: AppState,
    route_config: Option<RouteConfigFn>,
}

impl TestAppBuilder {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            route_config: None,
        }
    }

    /// Configure the app with the production route set (without the
    /// per-endpoint rate limiter, so suites can hammer login freely).
    pub fn with_prod_routes(mut self) -> Self {
        self.route_config = Some(Box::new(routes::configure) as RouteConfigFn);
        self
    }

    /// Configure the app with custom routes
    pub fn with_routes<F>(mut self, config_fn: F) -> Self
    where
        F: Fn(&mut web::ServiceConfig) + Send + Sync + 'static,
    {
        self.route_config = Some(Box::new(config_fn) as RouteConfigFn);
        self
    }

    /// Build the test service
    pub async fn build(
        self,
    ) -> Result<impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>, AppError>
    {
        let state = self.state;
        let route_config = self.route_config;

        // Wrap AppState with web::Data at the boundary
        let data = web::Data::new(state);

        let service = test::init_service(
            App::new()
                .wrap(StructuredLogger)
                .wrap(TraceSpan)
                .wrap(RequestTrace)
                .app_data(data)
                .app_data(routes::json_config())
                .configure(move |cfg| {
                    if let Some(config_fn) = &route_config {
                        config_fn(cfg);
                    }
                }),
        )
        .await;

        Ok(service)
    }
}

/// Create a new test app builder with the given AppState
pub fn create_test_app(state: AppState) -> TestAppBuilder {
    TestAppBuilder::new(state)
}

/// A registered account the suite can log in with.
pub struct TestAccount {
    pub email: String,
    pub username: String,
    pub password: String,
    pub id: String,
}

/// Register a fresh account over HTTP and return its coordinates.
pub async fn register_account<S>(app: &S, prefix: &str) -> TestAccount
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let email = backend_test_support::unique_email(prefix);
    let username = backend_test_support::unique_str(prefix);
    let password = "secret1".to_string();

    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "name": "Test User",
            "username": username,
            "email": email,
            "password": password,
        }))
        .to_request();

    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 201, "registration should succeed");

    let body: serde_json::Value = test::read_body_json(resp).await;
    let id = body["id"].as_str().expect("registration returns id").to_string();

    TestAccount {
        email,
        username,
        password,
        id,
    }
}

/// Log in over HTTP and return the session token.
pub async fn login_token<S>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();

    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 200, "login should succeed");

    let body: serde_json::Value = test::read_body_json(resp).await;
    body["token"].as_str().expect("login returns token").to_string()
}
