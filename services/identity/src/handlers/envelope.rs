//! Uniform response envelope: success is `{"data": ...}`, optionally with
//! `"meta": {"user": ...}`; failures are shaped by `IdentityError`.

use serde::Serialize;

use crate::domain::types::User;
use crate::usecase::session::SessionTokens;

use fieldnote_auth_types::cookie::ACCESS_TOKEN_EXP;

#[derive(Serialize)]
pub struct Envelope<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self { data, meta: None }
    }
}

#[derive(Serialize)]
pub struct Meta {
    pub user: UserSummary,
}

#[derive(Serialize)]
pub struct UserSummary {
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Body of every successful login response.
#[derive(Serialize)]
pub struct SessionData {
    #[serde(rename = "type")]
    pub token_type: &'static str,
    pub jwt: String,
    pub expires_in: u64,
}

pub fn login_envelope(user: &User, tokens: &SessionTokens) -> Envelope<SessionData> {
    Envelope {
        data: SessionData {
            token_type: "jwt",
            jwt: tokens.access_token.clone(),
            expires_in: ACCESS_TOKEN_EXP,
        },
        meta: Some(Meta {
            user: UserSummary::from(user),
        }),
    }
}
