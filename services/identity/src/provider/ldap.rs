use fieldnote_domain::email::normalize_email;
use fieldnote_domain::provider::ProviderKind;

use crate::domain::repository::DirectoryPort;
use crate::domain::types::{DisplayName, VerifiedIdentity};
use crate::error::IdentityError;

/// Directory bind via a [`DirectoryPort`].
///
/// LDAP is authentication-only: the reconciler refuses to provision or
/// activate an account for a directory identity, so this adapter only
/// proves the bind and carries the directory's email across.
pub struct LdapAdapter<D: DirectoryPort> {
    pub directory: D,
}

impl<D: DirectoryPort> LdapAdapter<D> {
    pub async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<VerifiedIdentity, IdentityError> {
        let entry = self.directory.bind(username, password).await?;
        let display = entry.display_name.map(|name| DisplayName {
            given: Some(name),
            family: None,
        });
        Ok(VerifiedIdentity {
            email: normalize_email(&entry.email),
            email_verified: true,
            display,
            kind: ProviderKind::Ldap,
        })
    }
}
