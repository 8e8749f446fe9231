use fieldnote_domain::email::normalize_email;
use fieldnote_domain::provider::ProviderKind;
use fieldnote_domain::user::UserState;

use crate::domain::repository::UserStore;
use crate::domain::types::VerifiedIdentity;
use crate::error::IdentityError;
use crate::provider::hash::verify_secret;

/// Username/password verification against the local account store.
///
/// Requires an active account with a stored password hash. All failure
/// shapes (unknown user, no password set, wrong password, non-active state)
/// collapse into `InvalidCredentials` so responses don't reveal which
/// accounts exist.
pub struct LocalAdapter<U: UserStore> {
    pub users: U,
}

impl<U: UserStore> LocalAdapter<U> {
    pub async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<VerifiedIdentity, IdentityError> {
        let email = normalize_email(username);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        if user.state != UserState::Active {
            return Err(IdentityError::InvalidCredentials);
        }
        let stored = user
            .password_hash
            .as_deref()
            .ok_or(IdentityError::InvalidCredentials)?;
        if !verify_secret(password, stored) {
            return Err(IdentityError::InvalidCredentials);
        }

        Ok(VerifiedIdentity {
            email,
            email_verified: true,
            display: None,
            kind: ProviderKind::Local,
        })
    }
}
