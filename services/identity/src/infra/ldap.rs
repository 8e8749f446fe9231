//! LDAP directory bind over LDAPS.
//!
//! STARTTLS is not offered; connections are TLS from the first byte.

use std::time::Duration;

use ldap3::{LdapConnAsync, LdapConnSettings, Scope, SearchEntry, drive};

use crate::config::LdapSettings;
use crate::domain::repository::DirectoryPort;
use crate::domain::types::DirectoryEntry;
use crate::error::IdentityError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// LDAP result code for invalid credentials.
const RC_INVALID_CREDENTIALS: u32 = 49;

#[derive(Clone)]
pub struct LdapDirectory {
    pub settings: LdapSettings,
}

impl DirectoryPort for LdapDirectory {
    async fn bind(
        &self,
        username: &str,
        password: &str,
    ) -> Result<DirectoryEntry, IdentityError> {
        let conn_settings = LdapConnSettings::new().set_conn_timeout(CONNECT_TIMEOUT);
        let (conn, mut ldap) =
            LdapConnAsync::with_settings(conn_settings, &self.settings.server_url)
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "ldap connect failed");
                    IdentityError::DirectoryUnavailable
                })?;
        drive!(conn);

        let dn = self.settings.bind_dn_template.replace("{username}", username);
        let bind = ldap.simple_bind(&dn, password).await.map_err(|e| {
            tracing::warn!(error = %e, "ldap bind errored");
            IdentityError::DirectoryUnavailable
        })?;
        match bind.rc {
            0 => {}
            RC_INVALID_CREDENTIALS => return Err(IdentityError::InvalidCredentials),
            rc => {
                tracing::warn!(rc, "unexpected ldap bind result");
                return Err(IdentityError::DirectoryUnavailable);
            }
        }

        // Read the bound entry's mail attribute (and cn for display).
        let (entries, _) = ldap
            .search(
                &dn,
                Scope::Base,
                "(objectClass=*)",
                vec![self.settings.mail_attribute.as_str(), "cn"],
            )
            .await
            .and_then(|r| r.success())
            .map_err(|e| {
                tracing::warn!(error = %e, "ldap entry lookup failed");
                IdentityError::DirectoryUnavailable
            })?;

        let _ = ldap.unbind().await;

        let entry = entries
            .into_iter()
            .next()
            .map(SearchEntry::construct)
            .ok_or(IdentityError::UserNotFound)?;
        let email = entry
            .attrs
            .get(&self.settings.mail_attribute)
            .and_then(|vals| vals.first())
            .cloned()
            .ok_or(IdentityError::UserNotFound)?;
        let display_name = entry
            .attrs
            .get("cn")
            .and_then(|vals| vals.first())
            .cloned();

        Ok(DirectoryEntry {
            email,
            display_name,
        })
    }
}
