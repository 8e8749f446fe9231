//! Apple identity-token validation against Apple's published JWKS.

use anyhow::Context as _;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;

use crate::config::AppleSettings;
use crate::domain::repository::AppleVerifier;
use crate::domain::types::AppleClaims;
use crate::error::IdentityError;

const APPLE_KEYS_URL: &str = "https://appleid.apple.com/auth/keys";
const APPLE_ISSUER: &str = "https://appleid.apple.com";

#[derive(Clone)]
pub struct HttpAppleVerifier {
    pub http: reqwest::Client,
    pub settings: AppleSettings,
}

#[derive(Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

impl AppleVerifier for HttpAppleVerifier {
    async fn verify_identity_token(&self, token: &str) -> Result<AppleClaims, IdentityError> {
        let header = decode_header(token).map_err(|_| IdentityError::InvalidCredentials)?;
        let kid = header.kid.ok_or(IdentityError::InvalidCredentials)?;

        let jwks: Jwks = self
            .http
            .get(APPLE_KEYS_URL)
            .send()
            .await
            .context("fetch apple jwks")?
            .json()
            .await
            .context("decode apple jwks")?;
        let jwk = jwks
            .keys
            .iter()
            .find(|k| k.kid == kid)
            // unknown kid: the token was not signed by Apple's current keys
            .ok_or(IdentityError::InvalidCredentials)?;

        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .context("build apple decoding key")?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.settings.client_id]);
        validation.set_issuer(&[APPLE_ISSUER]);

        let data = decode::<serde_json::Value>(token, &key, &validation)
            .map_err(|_| IdentityError::InvalidCredentials)?;
        let claims = data.claims;

        let email = claims
            .get("email")
            .and_then(|v| v.as_str())
            .ok_or(IdentityError::InvalidCredentials)?
            .to_owned();
        // Tri-state passthrough: absence must stay distinguishable from
        // "false" for the adapter.
        let email_verified = match claims.get("email_verified") {
            None => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
            Some(_) => None,
        };

        Ok(AppleClaims {
            email,
            email_verified,
        })
    }
}
