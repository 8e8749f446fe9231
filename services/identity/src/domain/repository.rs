#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{
    AppleClaims, CreatedProjectSummary, DeletionPlan, DirectoryEntry, GoogleProfile, OutboxEvent,
    PasswordlessCode, ProjectRoleBinding, ProviderLink, User,
};
use crate::error::IdentityError;

/// Store for user accounts, keyed by email.
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, IdentityError>;

    /// Insert a new user row. The email uniqueness constraint is surfaced as
    /// [`IdentityError::EmailAlreadyExists`] so a reconciliation race loser
    /// can retry down the existing-user path.
    async fn create(&self, user: &User) -> Result<(), IdentityError>;

    /// Persist the unverified → active transition together with the given
    /// profile names. The write completes before the caller proceeds.
    async fn activate(&self, id: Uuid, name: &str, last_name: &str)
    -> Result<(), IdentityError>;

    /// Overwrite placeholder names with real profile data.
    async fn update_names(
        &self,
        id: Uuid,
        name: &str,
        last_name: &str,
    ) -> Result<(), IdentityError>;
}

/// Store for (user, provider) links.
pub trait ProviderLinkStore: Send + Sync {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ProviderLink>, IdentityError>;

    /// Create-if-absent. The composite (user_id, provider) key makes this
    /// idempotent under concurrent first-time logins; an existing link is a
    /// no-op, never an error.
    async fn link_if_absent(&self, link: &ProviderLink) -> Result<(), IdentityError>;
}

/// Store for hashed one-time passwordless codes.
pub trait PasswordlessCodeStore: Send + Sync {
    /// Atomically replace any prior code for this email and enqueue the
    /// code mail in the same transaction. Afterwards exactly one live code
    /// exists for the address.
    async fn replace_with_outbox(
        &self,
        code: &PasswordlessCode,
        event: &OutboxEvent,
    ) -> Result<(), IdentityError>;

    /// Find the unexpired code for this email, if any.
    async fn find_live(&self, email: &str) -> Result<Option<PasswordlessCode>, IdentityError>;

    /// Delete the code row. Returns `true` if a row was deleted. Called the
    /// instant a code validates, so a replayed submission finds nothing.
    async fn consume(&self, email: &str) -> Result<bool, IdentityError>;
}

/// Read project ownership and execute deletion plans. Project CRUD itself
/// belongs to another service; this port only covers what account deletion
/// needs.
pub trait ProjectPort: Send + Sync {
    async fn roles_for_user(&self, user_id: Uuid)
    -> Result<Vec<ProjectRoleBinding>, IdentityError>;

    async fn created_project_summaries(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CreatedProjectSummary>, IdentityError>;

    /// Execute the whole plan — project deletes/archives plus the user
    /// mutation — inside one database transaction. Any failure rolls back
    /// everything.
    async fn apply_deletion_plan(
        &self,
        user_id: Uuid,
        plan: &DeletionPlan,
    ) -> Result<(), IdentityError>;
}

/// Enqueue mail-dispatch events outside a surrounding transaction.
pub trait OutboxPort: Send + Sync {
    async fn enqueue(&self, event: &OutboxEvent) -> Result<(), IdentityError>;
}

/// LDAP directory bind. Implementations authenticate the given credentials
/// and resolve the bound entry's email; they never touch local state.
pub trait DirectoryPort: Send + Sync {
    async fn bind(&self, username: &str, password: &str)
    -> Result<DirectoryEntry, IdentityError>;
}

/// Google authorization-code exchange (stateless mobile flow).
pub trait GoogleVerifier: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<GoogleProfile, IdentityError>;
}

/// Apple identity-token validation (signature, issuer, audience).
pub trait AppleVerifier: Send + Sync {
    async fn verify_identity_token(&self, token: &str) -> Result<AppleClaims, IdentityError>;
}
