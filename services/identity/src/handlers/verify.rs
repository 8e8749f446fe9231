//! Cross-provider verification endpoints: prove inbox ownership with a
//! passwordless code, then link a new federated provider and log in.

use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use fieldnote_domain::provider::ProviderKind;

use crate::domain::types::DisplayName;
use crate::error::IdentityError;
use crate::handlers::login::{ProfileBody, login_response};
use crate::state::AppState;
use crate::usecase::login::LoginOutput;
use crate::usecase::session::issue_session;
use crate::usecase::verify_link::{VerifyAndLinkInput, VerifyAndLinkUseCase};

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
    pub user: Option<ProfileBody>,
}

async fn verify_and_login(
    state: AppState,
    jar: CookieJar,
    body: VerifyRequest,
    new_provider: ProviderKind,
) -> Result<impl IntoResponse, IdentityError> {
    if !state.policy.allows(new_provider) {
        return Err(IdentityError::AuthMethodNotAllowed);
    }
    let usecase = VerifyAndLinkUseCase {
        users: state.user_store(),
        links: state.provider_link_store(),
        codes: state.passwordless_code_store(),
    };
    let user = usecase
        .execute(VerifyAndLinkInput {
            email: body.email,
            code: body.code,
            new_provider,
            profile: body.user.map(DisplayName::from),
        })
        .await?;
    let tokens = issue_session(&user, &state.jwt_secret)?;
    Ok(login_response(
        jar,
        state.cookie_domain.clone(),
        LoginOutput { user, tokens },
    ))
}

// ── POST /auth/verify/google ──────────────────────────────────────────────────

pub async fn verify_google(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<VerifyRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    verify_and_login(state, jar, body, ProviderKind::Google).await
}

// ── POST /auth/verify/apple ───────────────────────────────────────────────────

pub async fn verify_apple(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<VerifyRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    verify_and_login(state, jar, body, ProviderKind::Apple).await
}
