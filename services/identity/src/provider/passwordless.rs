use fieldnote_domain::email::normalize_email;
use fieldnote_domain::provider::ProviderKind;

use crate::domain::repository::PasswordlessCodeStore;
use crate::domain::types::{DisplayName, VerifiedIdentity};
use crate::error::IdentityError;

/// 6-digit code verification for passwordless login.
///
/// A code is single-use: it is consumed the instant it validates, so a
/// replayed submission finds no code and fails. Expired codes are invisible
/// to `find_live` and fail the same way.
pub struct PasswordlessAdapter<C: PasswordlessCodeStore> {
    pub codes: C,
}

impl<C: PasswordlessCodeStore> PasswordlessAdapter<C> {
    pub async fn verify(
        &self,
        email: &str,
        code: &str,
        profile: Option<DisplayName>,
    ) -> Result<VerifiedIdentity, IdentityError> {
        let email = normalize_email(email);
        let stored = self
            .codes
            .find_live(&email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !crate::provider::hash::verify_secret(code, &stored.code_hash) {
            return Err(IdentityError::InvalidCredentials);
        }
        self.codes.consume(&email).await?;

        Ok(VerifiedIdentity {
            email,
            email_verified: true,
            display: profile.filter(|d| !d.is_empty()),
            kind: ProviderKind::Passwordless,
        })
    }
}
