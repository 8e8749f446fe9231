//! Cross-provider verification: link a new provider to an existing account
//! after proving inbox ownership with a passwordless code.
//!
//! This is the consent step the reconciler directs callers to when a login
//! matches an account established under a different provider
//! (`ProviderVerificationRequired`). Auto-linking is never performed.

use chrono::Utc;

use fieldnote_domain::email::normalize_email;
use fieldnote_domain::provider::{ProviderKind, is_placeholder_name};
use fieldnote_domain::user::UserState;

use crate::domain::repository::{PasswordlessCodeStore, ProviderLinkStore, UserStore};
use crate::domain::types::{DisplayName, ProviderLink, User};
use crate::error::IdentityError;
use crate::provider::hash::verify_secret;

pub struct VerifyAndLinkInput {
    pub email: String,
    pub code: String,
    pub new_provider: ProviderKind,
    pub profile: Option<DisplayName>,
}

pub struct VerifyAndLinkUseCase<U, L, C>
where
    U: UserStore,
    L: ProviderLinkStore,
    C: PasswordlessCodeStore,
{
    pub users: U,
    pub links: L,
    pub codes: C,
}

impl<U, L, C> VerifyAndLinkUseCase<U, L, C>
where
    U: UserStore,
    L: ProviderLinkStore,
    C: PasswordlessCodeStore,
{
    pub async fn execute(&self, input: VerifyAndLinkInput) -> Result<User, IdentityError> {
        let email = normalize_email(&input.email);

        // The code is the ownership proof; check it before touching
        // anything. Missing, expired, or mismatched all fail the same way
        // and mutate nothing.
        let stored = self
            .codes
            .find_live(&email)
            .await?
            .ok_or(IdentityError::InvalidVerificationCode)?;
        if !verify_secret(&input.code, &stored.code_hash) {
            return Err(IdentityError::InvalidVerificationCode);
        }

        let mut user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::UserNotFound)?;
        if matches!(user.state, UserState::Disabled | UserState::Archived) {
            return Err(IdentityError::AccountDisabled);
        }

        // Proof accepted: consume the code (single use), then link.
        self.codes.consume(&email).await?;

        if user.state == UserState::Unverified {
            // the inbox proof is a first successful authentication
            let (name, last_name) = match &input.profile {
                Some(d) if !d.is_empty() => (
                    d.given.clone().unwrap_or_default(),
                    d.family.clone().unwrap_or_default(),
                ),
                _ => (
                    input.new_provider.placeholder_name().to_owned(),
                    String::new(),
                ),
            };
            self.users.activate(user.id, &name, &last_name).await?;
            user.state = UserState::Active;
            user.name = name;
            user.last_name = last_name;
        } else if is_placeholder_name(&user.name) {
            if let Some(d) = input.profile.as_ref().filter(|d| !d.is_empty()) {
                let name = d.given.clone().unwrap_or_default();
                let last_name = d.family.clone().unwrap_or_default();
                self.users.update_names(user.id, &name, &last_name).await?;
                user.name = name;
                user.last_name = last_name;
            }
        }

        self.links
            .link_if_absent(&ProviderLink {
                user_id: user.id,
                provider: input.new_provider,
                email: user.email.clone(),
                created_at: Utc::now(),
            })
            .await?;

        Ok(user)
    }
}
