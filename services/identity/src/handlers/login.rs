use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use fieldnote_auth_types::cookie::{set_access_token_cookie, set_refresh_token_cookie};

use crate::domain::types::DisplayName;
use crate::error::IdentityError;
use crate::handlers::envelope::login_envelope;
use crate::state::AppState;
use crate::usecase::login::{
    AppleLoginUseCase, GoogleLoginUseCase, LdapLoginUseCase, LocalLoginUseCase, LoginOutput,
};

const X_ACCESS_TOKEN_EXPIRES: &str = "x-fieldnote-access-token-expires";

pub(crate) fn token_expires_header(exp: u64) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(X_ACCESS_TOKEN_EXPIRES),
        HeaderValue::from_str(&exp.to_string()).unwrap(),
    )
}

/// Optional profile payload mobile clients send alongside provider tokens.
#[derive(Deserialize)]
pub struct ProfileBody {
    #[serde(rename = "givenName")]
    pub given_name: Option<String>,
    #[serde(rename = "familyName")]
    pub family_name: Option<String>,
}

impl From<ProfileBody> for DisplayName {
    fn from(p: ProfileBody) -> Self {
        Self {
            given: p.given_name,
            family: p.family_name,
        }
    }
}

/// Shared login response: session cookies, expiry header, envelope body.
pub(crate) fn login_response(
    jar: CookieJar,
    cookie_domain: String,
    out: LoginOutput,
) -> impl IntoResponse {
    let body = login_envelope(&out.user, &out.tokens);
    let jar = set_access_token_cookie(jar, out.tokens.access_token, cookie_domain.clone());
    let jar = set_refresh_token_cookie(jar, out.tokens.refresh_token, cookie_domain);

    let mut headers = HeaderMap::new();
    let (name, value) = token_expires_header(out.tokens.access_token_exp);
    headers.insert(name, value);

    (StatusCode::OK, jar, headers, Json(body))
}

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PasswordLoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn local_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<PasswordLoginRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    let usecase = LocalLoginUseCase {
        users: state.user_store(),
        links: state.provider_link_store(),
        policy: state.policy.clone(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase.execute(&body.username, &body.password).await?;
    Ok(login_response(jar, state.cookie_domain.clone(), out))
}

// ── POST /auth/login/ldap ─────────────────────────────────────────────────────

pub async fn ldap_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<PasswordLoginRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    let usecase = LdapLoginUseCase {
        users: state.user_store(),
        links: state.provider_link_store(),
        directory: state.directory()?,
        policy: state.policy.clone(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase.execute(&body.username, &body.password).await?;
    Ok(login_response(jar, state.cookie_domain.clone(), out))
}

// ── POST /auth/login/google ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GoogleLoginRequest {
    pub code: String,
    pub grant_type: Option<String>,
    pub user: Option<ProfileBody>,
}

pub async fn google_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<GoogleLoginRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    if body
        .grant_type
        .as_deref()
        .is_some_and(|g| g != "authorization_code")
    {
        return Err(IdentityError::InvalidCredentials);
    }
    let usecase = GoogleLoginUseCase {
        users: state.user_store(),
        links: state.provider_link_store(),
        google: state.google_verifier()?,
        policy: state.policy.clone(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(&body.code, body.user.map(DisplayName::from))
        .await?;
    Ok(login_response(jar, state.cookie_domain.clone(), out))
}

// ── POST /auth/login/apple ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AppleLoginRequest {
    #[serde(rename = "identityToken")]
    pub identity_token: String,
    pub user: Option<ProfileBody>,
}

pub async fn apple_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<AppleLoginRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    let usecase = AppleLoginUseCase {
        users: state.user_store(),
        links: state.provider_link_store(),
        apple: state.apple_verifier()?,
        policy: state.policy.clone(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(&body.identity_token, body.user.map(DisplayName::from))
        .await?;
    Ok(login_response(jar, state.cookie_domain.clone(), out))
}
