use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use fieldnote_auth_types::cookie::{
    FIELDNOTE_REFRESH_TOKEN, clear_cookies, set_access_token_cookie, set_refresh_token_cookie,
};

use crate::error::IdentityError;
use crate::handlers::envelope::Envelope;
use crate::handlers::extract::CurrentUser;
use crate::handlers::login::token_expires_header;
use crate::state::AppState;
use crate::usecase::session::RefreshSessionUseCase;

// ── GET /auth/token ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CheckTokenQuery {
    /// Optional minimum server role the token must carry.
    pub role: Option<u8>,
}

#[derive(Serialize)]
pub struct TokenStatus {
    pub user_id: uuid::Uuid,
    pub server_role: u8,
    pub access_token_exp: u64,
}

pub async fn check_token(
    current: CurrentUser,
    Query(query): Query<CheckTokenQuery>,
) -> Result<impl IntoResponse, IdentityError> {
    if let Some(min_role) = query.role {
        if current.server_role < min_role {
            return Err(IdentityError::InvalidToken);
        }
    }

    let body = Envelope::data(TokenStatus {
        user_id: current.user_id,
        server_role: current.server_role,
        access_token_exp: current.access_token_exp,
    });

    let mut headers = HeaderMap::new();
    let (name, value) = token_expires_header(current.access_token_exp);
    headers.insert(name, value);

    Ok((StatusCode::OK, headers, Json(body)))
}

// ── PATCH /auth/token ─────────────────────────────────────────────────────────

pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, IdentityError> {
    let refresh_value = jar
        .get(FIELDNOTE_REFRESH_TOKEN)
        .map(|c| c.value().to_owned())
        .ok_or(IdentityError::InvalidRefreshToken)?;

    let usecase = RefreshSessionUseCase {
        users: state.user_store(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase.execute(&refresh_value).await?;

    let jar = set_access_token_cookie(
        jar,
        out.tokens.access_token,
        state.cookie_domain.clone(),
    );
    let jar = set_refresh_token_cookie(
        jar,
        out.tokens.refresh_token,
        state.cookie_domain.clone(),
    );

    let mut headers = HeaderMap::new();
    let (name, value) = token_expires_header(out.tokens.access_token_exp);
    headers.insert(name, value);

    Ok((StatusCode::CREATED, jar, headers))
}

// ── DELETE /auth/token ────────────────────────────────────────────────────────

pub async fn revoke_token(
    State(state): State<AppState>,
    _current: CurrentUser,
    jar: CookieJar,
) -> Result<impl IntoResponse, IdentityError> {
    let jar = clear_cookies(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}
