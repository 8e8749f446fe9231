use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::domain::types::DisplayName;
use crate::error::IdentityError;
use crate::handlers::envelope::Envelope;
use crate::handlers::login::{ProfileBody, login_response};
use crate::state::AppState;
use crate::usecase::login::PasswordlessLoginUseCase;
use crate::usecase::passwordless::{SendCodeInput, SendCodeUseCase};

// ── POST /auth/passwordless/code ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct SendCodeData {
    pub sent: bool,
}

pub async fn send_code(
    State(state): State<AppState>,
    Json(body): Json<SendCodeRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    let usecase = SendCodeUseCase {
        codes: state.passwordless_code_store(),
    };
    usecase.execute(SendCodeInput { email: body.email }).await?;
    // Deliberately generic: reveals nothing about whether an account exists.
    Ok((
        StatusCode::OK,
        Json(Envelope::data(SendCodeData { sent: true })),
    ))
}

// ── POST /auth/passwordless/login ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PasswordlessLoginRequest {
    pub email: String,
    pub code: String,
    pub user: Option<ProfileBody>,
}

pub async fn passwordless_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<PasswordlessLoginRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    let usecase = PasswordlessLoginUseCase {
        users: state.user_store(),
        links: state.provider_link_store(),
        codes: state.passwordless_code_store(),
        policy: state.policy.clone(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(&body.email, &body.code, body.user.map(DisplayName::from))
        .await?;
    Ok(login_response(jar, state.cookie_domain.clone(), out))
}
