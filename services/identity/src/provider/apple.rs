use fieldnote_domain::email::normalize_email;
use fieldnote_domain::provider::ProviderKind;

use crate::domain::repository::AppleVerifier;
use crate::domain::types::{DisplayName, VerifiedIdentity};
use crate::error::IdentityError;

/// Apple identity-token verification.
///
/// The `email_verified` claim is tri-state: Apple omits it entirely when a
/// user has changed their Apple ID email. An absent claim is a distinct
/// hard failure (`MissingVerificationClaim`), never silently treated as
/// "present but false" (`EmailNotVerified`).
pub struct AppleAdapter<A: AppleVerifier> {
    pub apple: A,
}

impl<A: AppleVerifier> AppleAdapter<A> {
    /// `profile` is the name payload Apple clients only send on first
    /// authorization; later logins carry the token alone.
    pub async fn verify(
        &self,
        identity_token: &str,
        profile: Option<DisplayName>,
    ) -> Result<VerifiedIdentity, IdentityError> {
        let claims = self.apple.verify_identity_token(identity_token).await?;

        match claims.email_verified.as_deref() {
            None => return Err(IdentityError::MissingVerificationClaim),
            Some("true") => {}
            Some(_) => return Err(IdentityError::EmailNotVerified),
        }

        Ok(VerifiedIdentity {
            email: normalize_email(&claims.email),
            email_verified: true,
            display: profile.filter(|d| !d.is_empty()),
            kind: ProviderKind::Apple,
        })
    }
}
