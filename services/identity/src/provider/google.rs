use fieldnote_domain::email::normalize_email;
use fieldnote_domain::provider::ProviderKind;

use crate::domain::repository::GoogleVerifier;
use crate::domain::types::{DisplayName, VerifiedIdentity};
use crate::error::IdentityError;

/// Google authorization-code verification (stateless mobile flow).
///
/// Google verifies the email before handing out a profile; an unverified
/// address is refused here rather than passed to the reconciler.
pub struct GoogleAdapter<G: GoogleVerifier> {
    pub google: G,
}

impl<G: GoogleVerifier> GoogleAdapter<G> {
    /// `profile` is the optional name payload the mobile client sends along
    /// with the code; the provider profile is the fallback.
    pub async fn verify(
        &self,
        code: &str,
        profile: Option<DisplayName>,
    ) -> Result<VerifiedIdentity, IdentityError> {
        let p = self.google.exchange_code(code).await?;
        if !p.email_verified {
            return Err(IdentityError::EmailNotVerified);
        }

        let provider_display = match (p.given_name, p.family_name) {
            (None, None) => None,
            (given, family) => Some(DisplayName { given, family }),
        };
        let display = profile.filter(|d| !d.is_empty()).or(provider_display);

        Ok(VerifiedIdentity {
            email: normalize_email(&p.email),
            email_verified: true,
            display,
            kind: ProviderKind::Google,
        })
    }
}
