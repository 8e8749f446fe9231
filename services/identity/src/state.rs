use sea_orm::DatabaseConnection;

use crate::config::{AppleSettings, AuthPolicy, GoogleSettings, LdapSettings};
use crate::error::IdentityError;
use crate::infra::apple::HttpAppleVerifier;
use crate::infra::db::{
    DbOutboxStore, DbPasswordlessCodeStore, DbProjectStore, DbProviderLinkStore, DbUserStore,
};
use crate::infra::google::HttpGoogleVerifier;
use crate::infra::ldap::LdapDirectory;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub http: reqwest::Client,
    pub jwt_secret: String,
    pub cookie_domain: String,
    pub policy: AuthPolicy,
    pub ldap: Option<LdapSettings>,
    pub google: Option<GoogleSettings>,
    pub apple: Option<AppleSettings>,
}

impl AppState {
    pub fn user_store(&self) -> DbUserStore {
        DbUserStore {
            db: self.db.clone(),
        }
    }

    pub fn provider_link_store(&self) -> DbProviderLinkStore {
        DbProviderLinkStore {
            db: self.db.clone(),
        }
    }

    pub fn passwordless_code_store(&self) -> DbPasswordlessCodeStore {
        DbPasswordlessCodeStore {
            db: self.db.clone(),
        }
    }

    pub fn project_store(&self) -> DbProjectStore {
        DbProjectStore {
            db: self.db.clone(),
        }
    }

    pub fn outbox_store(&self) -> DbOutboxStore {
        DbOutboxStore {
            db: self.db.clone(),
        }
    }

    /// Directory port, if LDAP is configured for this deployment.
    pub fn directory(&self) -> Result<LdapDirectory, IdentityError> {
        self.ldap
            .clone()
            .map(|settings| LdapDirectory { settings })
            .ok_or(IdentityError::AuthMethodNotAllowed)
    }

    pub fn google_verifier(&self) -> Result<HttpGoogleVerifier, IdentityError> {
        self.google
            .clone()
            .map(|settings| HttpGoogleVerifier {
                http: self.http.clone(),
                settings,
            })
            .ok_or(IdentityError::AuthMethodNotAllowed)
    }

    pub fn apple_verifier(&self) -> Result<HttpAppleVerifier, IdentityError> {
        self.apple
            .clone()
            .map(|settings| HttpAppleVerifier {
                http: self.http.clone(),
                settings,
            })
            .ok_or(IdentityError::AuthMethodNotAllowed)
    }
}
