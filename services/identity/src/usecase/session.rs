//! Session issue and refresh.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use fieldnote_auth_types::cookie::{ACCESS_TOKEN_EXP, REFRESH_TOKEN_EXP};
use fieldnote_auth_types::token::{JwtClaims, validate_token};
use fieldnote_domain::user::UserState;

use crate::domain::repository::UserStore;
use crate::domain::types::User;
use crate::error::IdentityError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

fn encode_claims(user: &User, exp: u64, secret: &str) -> Result<String, IdentityError> {
    let claims = JwtClaims {
        sub: user.id.to_string(),
        role: user.server_role.as_i16() as u8,
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| IdentityError::Internal(e.into()))
}

pub fn issue_access_token(user: &User, secret: &str) -> Result<(String, u64), IdentityError> {
    let exp = now_secs() + ACCESS_TOKEN_EXP;
    Ok((encode_claims(user, exp, secret)?, exp))
}

pub fn issue_refresh_token(user: &User, secret: &str) -> Result<String, IdentityError> {
    let exp = now_secs() + REFRESH_TOKEN_EXP;
    encode_claims(user, exp, secret)
}

/// Credentials handed back after a successful reconciliation.
#[derive(Debug)]
pub struct SessionTokens {
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

pub fn issue_session(user: &User, secret: &str) -> Result<SessionTokens, IdentityError> {
    let (access_token, access_token_exp) = issue_access_token(user, secret)?;
    let refresh_token = issue_refresh_token(user, secret)?;
    Ok(SessionTokens {
        access_token,
        access_token_exp,
        refresh_token,
    })
}

// ── RefreshSession ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RefreshSessionOutput {
    pub user_id: Uuid,
    pub server_role: u8,
    pub tokens: SessionTokens,
}

pub struct RefreshSessionUseCase<U: UserStore> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserStore> RefreshSessionUseCase<U> {
    pub async fn execute(
        &self,
        refresh_token_value: &str,
    ) -> Result<RefreshSessionOutput, IdentityError> {
        // Validate refresh token (sig + exp); an expired access token is
        // irrelevant here.
        let claims = validate_token(refresh_token_value, &self.jwt_secret)
            .map_err(|_| IdentityError::InvalidRefreshToken)?;

        let user_id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| IdentityError::InvalidRefreshToken)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(IdentityError::InvalidRefreshToken)?;

        // A token minted before the account was disabled or archived must
        // not keep the session alive.
        if user.state != UserState::Active {
            return Err(IdentityError::InvalidRefreshToken);
        }

        let tokens = issue_session(&user, &self.jwt_secret)?;
        Ok(RefreshSessionOutput {
            user_id: user.id,
            server_role: user.server_role.as_i16() as u8,
            tokens,
        })
    }
}
