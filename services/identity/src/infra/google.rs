//! Google authorization-code exchange (stateless mobile flow).

use anyhow::Context as _;
use serde::Deserialize;

use crate::config::GoogleSettings;
use crate::domain::repository::GoogleVerifier;
use crate::domain::types::GoogleProfile;
use crate::error::IdentityError;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

#[derive(Clone)]
pub struct HttpGoogleVerifier {
    pub http: reqwest::Client,
    pub settings: GoogleSettings,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfo {
    email: String,
    #[serde(default)]
    email_verified: bool,
    given_name: Option<String>,
    family_name: Option<String>,
}

impl GoogleVerifier for HttpGoogleVerifier {
    async fn exchange_code(&self, code: &str) -> Result<GoogleProfile, IdentityError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", &self.settings.client_id),
                ("client_secret", &self.settings.client_secret),
                ("redirect_uri", &self.settings.redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .context("google token exchange request")?;
        if !response.status().is_success() {
            // rejected code: user error, not infrastructure
            return Err(IdentityError::InvalidCredentials);
        }
        let token: TokenResponse = response
            .json()
            .await
            .context("decode google token response")?;

        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .context("google userinfo request")?;
        if !response.status().is_success() {
            return Err(IdentityError::InvalidCredentials);
        }
        let info: UserInfo = response.json().await.context("decode google userinfo")?;

        Ok(GoogleProfile {
            email: info.email,
            email_verified: info.email_verified,
            given_name: info.given_name,
            family_name: info.family_name,
        })
    }
}
