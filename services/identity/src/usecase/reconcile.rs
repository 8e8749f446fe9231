//! Account reconciliation: mapping a freshly verified external identity
//! onto exactly one internal user record.
//!
//! Email is the join key across independently-operated identity providers,
//! and providers differ in trust level, so one provider must never silently
//! inherit an identity established by another. The decision table lives in
//! [`AccountReconciler::reconcile`]; the code-verified linking flow
//! (`usecase::verify_link`) is the consent path for ambiguous matches.

use fieldnote_domain::provider::{ProviderKind, is_placeholder_name};
use fieldnote_domain::user::UserState;

use crate::config::AuthPolicy;
use crate::domain::repository::{ProviderLinkStore, UserStore};
use crate::domain::types::{ProviderLink, User, VerifiedIdentity};
use crate::error::IdentityError;

pub struct AccountReconciler<U: UserStore, L: ProviderLinkStore> {
    pub users: U,
    pub links: L,
    pub policy: AuthPolicy,
}

impl<U: UserStore, L: ProviderLinkStore> AccountReconciler<U, L> {
    /// Resolve a verified identity to a user ready for session issue.
    ///
    /// Every state transition taken here is persisted through the store
    /// before the method proceeds; the returned `User` mirrors the stored
    /// row.
    pub async fn reconcile(&self, identity: &VerifiedIdentity) -> Result<User, IdentityError> {
        if !self.policy.allows(identity.kind) {
            return Err(IdentityError::AuthMethodNotAllowed);
        }

        match self.users.find_by_email(&identity.email).await? {
            None => self.provision(identity).await,
            Some(user) => self.resolve_existing(user, identity).await,
        }
    }

    /// No account under this email yet: create one, unless the provider is
    /// authentication-only.
    async fn provision(&self, identity: &VerifiedIdentity) -> Result<User, IdentityError> {
        if identity.kind == ProviderKind::Ldap {
            // the directory authenticates; it never provisions accounts
            return Err(IdentityError::UserNotFound);
        }

        let (name, last_name) = identity.name_or_placeholder();
        let user = User::new_active(identity.email.clone(), name, last_name);

        match self.users.create(&user).await {
            Ok(()) => {
                self.link(&user, identity.kind).await?;
                Ok(user)
            }
            // Lost the creation race: a concurrent login registered this
            // email between lookup and insert. Re-read the winner's row and
            // continue down the existing-user path.
            Err(IdentityError::EmailAlreadyExists) => {
                let user = self
                    .users
                    .find_by_email(&identity.email)
                    .await?
                    .ok_or_else(|| {
                        IdentityError::Internal(anyhow::anyhow!(
                            "user vanished after duplicate-email conflict"
                        ))
                    })?;
                self.resolve_existing(user, identity).await
            }
            Err(e) => Err(e),
        }
    }

    async fn resolve_existing(
        &self,
        user: User,
        identity: &VerifiedIdentity,
    ) -> Result<User, IdentityError> {
        match user.state {
            UserState::Disabled | UserState::Archived => Err(IdentityError::AccountDisabled),
            UserState::Unverified => self.activate(user, identity).await,
            UserState::Active => self.login_active(user, identity).await,
        }
    }

    /// The account was referenced (e.g. invited into a project) before ever
    /// authenticating. First successful authentication activates it.
    async fn activate(
        &self,
        mut user: User,
        identity: &VerifiedIdentity,
    ) -> Result<User, IdentityError> {
        if identity.kind == ProviderKind::Ldap {
            // no activation path for directory identities
            return Err(IdentityError::UserNotFound);
        }

        let (name, last_name) = if is_placeholder_name(&user.name) {
            identity.name_or_placeholder()
        } else {
            (user.name.clone(), user.last_name.clone())
        };
        self.users.activate(user.id, &name, &last_name).await?;
        user.state = UserState::Active;
        user.name = name;
        user.last_name = last_name;

        self.link(&user, identity.kind).await?;
        Ok(user)
    }

    async fn login_active(
        &self,
        user: User,
        identity: &VerifiedIdentity,
    ) -> Result<User, IdentityError> {
        let links = self.links.list_for_user(user.id).await?;
        let has = |kind: ProviderKind| links.iter().any(|l| l.provider == kind);

        // Already linked: idempotent login.
        if has(identity.kind) {
            return self.refresh_placeholder(user, identity).await;
        }

        // A password identity exists but this provider is new. The password
        // owner must consent before a federated source inherits the account.
        if has(ProviderKind::Local) {
            if self.policy.forces_password_for(identity.kind, user.server_role)
                || self.policy.local_api_login_enabled
            {
                return Err(IdentityError::AmbiguousProviderLocalPresent);
            }
            return Err(IdentityError::ProviderVerificationRequired);
        }

        // The account lives under a different provider. Auto-linking here
        // would let anyone controlling the same email at another provider
        // take the account over; require the code-verified link instead.
        if !links.is_empty() {
            return Err(IdentityError::ProviderVerificationRequired);
        }

        // No links at all (imported or admin-created account): first
        // authenticated provider claims it.
        self.link(&user, identity.kind).await?;
        self.refresh_placeholder(user, identity).await
    }

    /// Overwrite a placeholder display name once real profile data arrives.
    async fn refresh_placeholder(
        &self,
        mut user: User,
        identity: &VerifiedIdentity,
    ) -> Result<User, IdentityError> {
        if !is_placeholder_name(&user.name) {
            return Ok(user);
        }
        let (name, last_name) = identity.name_or_placeholder();
        if is_placeholder_name(&name) {
            return Ok(user);
        }
        self.users.update_names(user.id, &name, &last_name).await?;
        user.name = name;
        user.last_name = last_name;
        Ok(user)
    }

    async fn link(&self, user: &User, kind: ProviderKind) -> Result<(), IdentityError> {
        self.links
            .link_if_absent(&ProviderLink::new(user.id, kind, user.email.clone()))
            .await
    }
}
