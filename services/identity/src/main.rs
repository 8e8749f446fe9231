use sea_orm::Database;
use tracing::info;

use fieldnote_identity::config::IdentityConfig;
use fieldnote_identity::router::build_router;
use fieldnote_identity::state::AppState;

#[tokio::main]
async fn main() {
    fieldnote_core::tracing::init_tracing();

    let config = IdentityConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("failed to build HTTP client");

    let state = AppState {
        db,
        http,
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        policy: config.policy,
        ldap: config.ldap,
        google: config.google,
        apple: config.apple,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.identity_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("identity service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
