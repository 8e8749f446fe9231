use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use fieldnote_core::health::{healthz, readyz};
use fieldnote_core::middleware::request_id_layer;

use crate::handlers::{
    account::{delete_account_mobile, delete_account_web},
    login::{apple_login, google_login, ldap_login, local_login},
    passwordless::{passwordless_login, send_code},
    token::{check_token, refresh_token, revoke_token},
    verify::{verify_apple, verify_google},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Login
        .route("/auth/login", post(local_login))
        .route("/auth/login/ldap", post(ldap_login))
        .route("/auth/login/google", post(google_login))
        .route("/auth/login/apple", post(apple_login))
        // Passwordless
        .route("/auth/passwordless/code", post(send_code))
        .route("/auth/passwordless/login", post(passwordless_login))
        // Cross-provider verification
        .route("/auth/verify/google", post(verify_google))
        .route("/auth/verify/apple", post(verify_apple))
        // Session maintenance
        .route("/auth/token", get(check_token))
        .route("/auth/token", patch(refresh_token))
        .route("/auth/token", delete(revoke_token))
        // Account lifecycle
        .route("/account", delete(delete_account_web))
        .route("/account/deletion", post(delete_account_mobile))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
