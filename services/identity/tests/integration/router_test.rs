//! Router-level tests: envelope shape, token extraction, route wiring.
//! These routes never reach the database, so a disconnected handle is fine.

use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use uuid::Uuid;

use fieldnote_identity::config::AuthPolicy;
use fieldnote_identity::router::build_router;
use fieldnote_identity::state::AppState;
use fieldnote_testing::auth::TestToken;

use crate::helpers::TEST_JWT_SECRET;

fn test_state(policy: AuthPolicy) -> AppState {
    AppState {
        db: DatabaseConnection::default(),
        http: reqwest::Client::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        cookie_domain: "example.com".to_owned(),
        policy,
        ldap: None,
        google: None,
        apple: None,
    }
}

fn server(policy: AuthPolicy) -> TestServer {
    TestServer::new(build_router(test_state(policy))).unwrap()
}

#[tokio::test]
async fn should_answer_health_checks() {
    let server = server(AuthPolicy::default());
    server.get("/healthz").await.assert_status_ok();
    server.get("/readyz").await.assert_status_ok();
}

#[tokio::test]
async fn should_reject_token_check_without_token() {
    let server = server(AuthPolicy::default());

    let res = server.get("/auth/token").await;

    res.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = res.json();
    assert_eq!(body["errors"][0]["code"], "ec5_219");
    assert_eq!(body["errors"][0]["source"], "token");
}

#[tokio::test]
async fn should_check_valid_bearer_token() {
    let server = server(AuthPolicy::default());
    let user_id = Uuid::now_v7();
    let token = TestToken::new(user_id, 1).jwt(TEST_JWT_SECRET);

    let res = server.get("/auth/token").authorization_bearer(&token).await;

    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["data"]["user_id"], user_id.to_string());
    assert_eq!(body["data"]["server_role"], 1);
    assert!(
        res.headers()
            .contains_key("x-fieldnote-access-token-expires")
    );
}

#[tokio::test]
async fn should_reject_token_below_required_role() {
    let server = server(AuthPolicy::default());
    let token = TestToken::new(Uuid::now_v7(), 0).jwt(TEST_JWT_SECRET);

    let res = server
        .get("/auth/token")
        .add_query_param("role", 2)
        .authorization_bearer(&token)
        .await;

    res.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_expired_bearer_token() {
    let server = server(AuthPolicy::default());
    let token = TestToken::expired(Uuid::now_v7(), 0).jwt(TEST_JWT_SECRET);

    let res = server.get("/auth/token").authorization_bearer(&token).await;
    res.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_revoke_token_clearing_cookies() {
    let server = server(AuthPolicy::default());
    let token = TestToken::new(Uuid::now_v7(), 0).jwt(TEST_JWT_SECRET);

    let res = server
        .delete("/auth/token")
        .authorization_bearer(&token)
        .await;

    res.assert_status(StatusCode::NO_CONTENT);
    let set_cookie: Vec<_> = res
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_owned())
        .collect();
    assert!(
        set_cookie
            .iter()
            .any(|c| c.starts_with("fieldnote_access_token=") && c.contains("Max-Age=0"))
    );
}

#[tokio::test]
async fn should_reject_disabled_login_method_with_envelope() {
    // local switched off entirely: refused before any store access
    let server = server(AuthPolicy {
        allowed_methods: vec![],
        ..AuthPolicy::default()
    });

    let res = server
        .post("/auth/login")
        .json(&serde_json::json!({"username": "a@x.com", "password": "pw"}))
        .await;

    res.assert_status(StatusCode::FORBIDDEN);
    let body: Value = res.json();
    assert_eq!(body["errors"][0]["code"], "ec5_55");
    assert_eq!(body["errors"][0]["source"], "configuration");
}

#[tokio::test]
async fn should_require_auth_for_account_deletion() {
    let server = server(AuthPolicy::default());

    let res = server.delete("/account").await;
    res.assert_status(StatusCode::UNAUTHORIZED);

    let res = server.post("/account/deletion").await;
    res.assert_status(StatusCode::UNAUTHORIZED);
}
