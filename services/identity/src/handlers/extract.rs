//! Authenticated-caller extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use fieldnote_auth_types::cookie::FIELDNOTE_ACCESS_TOKEN;
use fieldnote_auth_types::token::validate_access_token;

use crate::error::IdentityError;
use crate::state::AppState;

/// Caller identity taken from `Authorization: Bearer` (mobile) or the
/// access-token cookie (web), in that order.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub server_role: u8,
    pub access_token_exp: u64,
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = IdentityError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async
    // fn`). In Rust 1.82+ precise capturing, `async fn` captures lifetimes
    // differently, causing E0195. Fix: extract values synchronously, return
    // a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = bearer_token(parts).or_else(|| {
            CookieJar::from_headers(&parts.headers)
                .get(FIELDNOTE_ACCESS_TOKEN)
                .map(|c| c.value().to_owned())
        });
        let secret = state.jwt_secret.clone();

        async move {
            let token = token.ok_or(IdentityError::InvalidToken)?;
            let info = validate_access_token(&token, &secret)
                .map_err(|_| IdentityError::InvalidToken)?;
            Ok(Self {
                user_id: info.user_id,
                server_role: info.server_role,
                access_token_exp: info.access_token_exp,
            })
        }
    }
}
