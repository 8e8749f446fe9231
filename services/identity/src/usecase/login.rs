//! Per-provider login: adapter verification, reconciliation, session issue.
//!
//! Each usecase is the same three-step pipeline with a different adapter in
//! front; the decision logic lives once, in the reconciler.

use crate::config::AuthPolicy;
use crate::domain::repository::{
    AppleVerifier, DirectoryPort, GoogleVerifier, PasswordlessCodeStore, ProviderLinkStore,
    UserStore,
};
use crate::domain::types::{DisplayName, User, VerifiedIdentity};
use crate::error::IdentityError;
use crate::provider::apple::AppleAdapter;
use crate::provider::google::GoogleAdapter;
use crate::provider::ldap::LdapAdapter;
use crate::provider::local::LocalAdapter;
use crate::provider::passwordless::PasswordlessAdapter;
use crate::usecase::reconcile::AccountReconciler;
use crate::usecase::session::{SessionTokens, issue_session};

use fieldnote_domain::provider::ProviderKind;

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub tokens: SessionTokens,
}

// ── Local ────────────────────────────────────────────────────────────────────

pub struct LocalLoginUseCase<U, L>
where
    U: UserStore + Clone,
    L: ProviderLinkStore + Clone,
{
    pub users: U,
    pub links: L,
    pub policy: AuthPolicy,
    pub jwt_secret: String,
}

impl<U, L> LocalLoginUseCase<U, L>
where
    U: UserStore + Clone,
    L: ProviderLinkStore + Clone,
{
    pub async fn execute(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginOutput, IdentityError> {
        if !self.policy.allows(ProviderKind::Local) {
            return Err(IdentityError::AuthMethodNotAllowed);
        }
        let adapter = LocalAdapter {
            users: self.users.clone(),
        };
        let identity = adapter.verify(username, password).await?;
        finish(
            self.users.clone(),
            self.links.clone(),
            self.policy.clone(),
            &self.jwt_secret,
            identity,
        )
        .await
    }
}

// ── LDAP ─────────────────────────────────────────────────────────────────────

pub struct LdapLoginUseCase<U, L, D>
where
    U: UserStore + Clone,
    L: ProviderLinkStore + Clone,
    D: DirectoryPort,
{
    pub users: U,
    pub links: L,
    pub directory: D,
    pub policy: AuthPolicy,
    pub jwt_secret: String,
}

impl<U, L, D> LdapLoginUseCase<U, L, D>
where
    U: UserStore + Clone,
    L: ProviderLinkStore + Clone,
    D: DirectoryPort + Clone,
{
    pub async fn execute(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginOutput, IdentityError> {
        if !self.policy.allows(ProviderKind::Ldap) {
            return Err(IdentityError::AuthMethodNotAllowed);
        }
        let adapter = LdapAdapter {
            directory: self.directory.clone(),
        };
        let identity = adapter.verify(username, password).await?;
        finish(
            self.users.clone(),
            self.links.clone(),
            self.policy.clone(),
            &self.jwt_secret,
            identity,
        )
        .await
    }
}

// ── Google ───────────────────────────────────────────────────────────────────

pub struct GoogleLoginUseCase<U, L, G>
where
    U: UserStore + Clone,
    L: ProviderLinkStore + Clone,
    G: GoogleVerifier,
{
    pub users: U,
    pub links: L,
    pub google: G,
    pub policy: AuthPolicy,
    pub jwt_secret: String,
}

impl<U, L, G> GoogleLoginUseCase<U, L, G>
where
    U: UserStore + Clone,
    L: ProviderLinkStore + Clone,
    G: GoogleVerifier + Clone,
{
    pub async fn execute(
        &self,
        code: &str,
        profile: Option<DisplayName>,
    ) -> Result<LoginOutput, IdentityError> {
        if !self.policy.allows(ProviderKind::Google) {
            return Err(IdentityError::AuthMethodNotAllowed);
        }
        let adapter = GoogleAdapter {
            google: self.google.clone(),
        };
        let identity = adapter.verify(code, profile).await?;
        finish(
            self.users.clone(),
            self.links.clone(),
            self.policy.clone(),
            &self.jwt_secret,
            identity,
        )
        .await
    }
}

// ── Apple ────────────────────────────────────────────────────────────────────

pub struct AppleLoginUseCase<U, L, A>
where
    U: UserStore + Clone,
    L: ProviderLinkStore + Clone,
    A: AppleVerifier,
{
    pub users: U,
    pub links: L,
    pub apple: A,
    pub policy: AuthPolicy,
    pub jwt_secret: String,
}

impl<U, L, A> AppleLoginUseCase<U, L, A>
where
    U: UserStore + Clone,
    L: ProviderLinkStore + Clone,
    A: AppleVerifier + Clone,
{
    pub async fn execute(
        &self,
        identity_token: &str,
        profile: Option<DisplayName>,
    ) -> Result<LoginOutput, IdentityError> {
        if !self.policy.allows(ProviderKind::Apple) {
            return Err(IdentityError::AuthMethodNotAllowed);
        }
        let adapter = AppleAdapter {
            apple: self.apple.clone(),
        };
        let identity = adapter.verify(identity_token, profile).await?;
        finish(
            self.users.clone(),
            self.links.clone(),
            self.policy.clone(),
            &self.jwt_secret,
            identity,
        )
        .await
    }
}

// ── Passwordless ─────────────────────────────────────────────────────────────

pub struct PasswordlessLoginUseCase<U, L, C>
where
    U: UserStore + Clone,
    L: ProviderLinkStore + Clone,
    C: PasswordlessCodeStore,
{
    pub users: U,
    pub links: L,
    pub codes: C,
    pub policy: AuthPolicy,
    pub jwt_secret: String,
}

impl<U, L, C> PasswordlessLoginUseCase<U, L, C>
where
    U: UserStore + Clone,
    L: ProviderLinkStore + Clone,
    C: PasswordlessCodeStore + Clone,
{
    pub async fn execute(
        &self,
        email: &str,
        code: &str,
        profile: Option<DisplayName>,
    ) -> Result<LoginOutput, IdentityError> {
        if !self.policy.allows(ProviderKind::Passwordless) {
            return Err(IdentityError::AuthMethodNotAllowed);
        }
        let adapter = PasswordlessAdapter {
            codes: self.codes.clone(),
        };
        let identity = adapter.verify(email, code, profile).await?;
        finish(
            self.users.clone(),
            self.links.clone(),
            self.policy.clone(),
            &self.jwt_secret,
            identity,
        )
        .await
    }
}

// ── Shared tail ──────────────────────────────────────────────────────────────

async fn finish<U: UserStore, L: ProviderLinkStore>(
    users: U,
    links: L,
    policy: AuthPolicy,
    jwt_secret: &str,
    identity: VerifiedIdentity,
) -> Result<LoginOutput, IdentityError> {
    let reconciler = AccountReconciler {
        users,
        links,
        policy,
    };
    let user = reconciler.reconcile(&identity).await?;
    let tokens = issue_session(&user, jwt_secret)?;
    Ok(LoginOutput { user, tokens })
}
