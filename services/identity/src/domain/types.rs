use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fieldnote_domain::project::{ProjectRole, ProjectStatus};
use fieldnote_domain::provider::ProviderKind;
use fieldnote_domain::user::{ServerRole, UserState};

/// Passwordless / verification code time-to-live in seconds.
pub const CODE_TTL_SECS: i64 = 300;

/// Passwordless / verification code length (numeric digits).
pub const CODE_LEN: usize = 6;

/// User account as seen by reconciliation and lifecycle logic.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub last_name: String,
    pub server_role: ServerRole,
    pub state: UserState,
    /// Argon2 hash; present only for accounts with a local password.
    /// Never serialized into any response.
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// A freshly provisioned account: active, basic role, no password.
    pub fn new_active(email: String, name: String, last_name: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            email,
            name,
            last_name,
            server_role: ServerRole::Basic,
            state: UserState::Active,
            password_hash: None,
            created_at: Utc::now(),
        }
    }
}

/// Profile names supplied by a provider alongside authentication.
#[derive(Debug, Clone, Default)]
pub struct DisplayName {
    pub given: Option<String>,
    pub family: Option<String>,
}

impl DisplayName {
    pub fn is_empty(&self) -> bool {
        self.given.as_deref().is_none_or(str::is_empty)
            && self.family.as_deref().is_none_or(str::is_empty)
    }
}

/// Canonical result of a successful external authentication, normalized
/// across providers. Producing one never mutates User or ProviderLink state.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Canonicalized (trimmed, lowercased) email.
    pub email: String,
    pub email_verified: bool,
    /// Profile names if the provider supplied any; `None` is an expected
    /// absence, not an error.
    pub display: Option<DisplayName>,
    pub kind: ProviderKind,
}

impl VerifiedIdentity {
    /// Name pair for a new or placeholder account: the provider-supplied
    /// names, falling back to the provider's placeholder.
    pub fn name_or_placeholder(&self) -> (String, String) {
        match &self.display {
            Some(d) if !d.is_empty() => (
                d.given.clone().unwrap_or_default(),
                d.family.clone().unwrap_or_default(),
            ),
            _ => (self.kind.placeholder_name().to_owned(), String::new()),
        }
    }
}

/// A (user, provider) link: this user has authenticated via this provider
/// at least once.
#[derive(Debug, Clone)]
pub struct ProviderLink {
    pub user_id: Uuid,
    pub provider: ProviderKind,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl ProviderLink {
    pub fn new(user_id: Uuid, provider: ProviderKind, email: String) -> Self {
        Self {
            user_id,
            provider,
            email,
            created_at: Utc::now(),
        }
    }
}

/// Stored hashed passwordless code. At most one per email.
#[derive(Debug, Clone)]
pub struct PasswordlessCode {
    pub email: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PasswordlessCode {
    pub fn is_live(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

/// Directory entry resolved by a successful LDAP bind.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub email: String,
    pub display_name: Option<String>,
}

/// Profile returned by the Google code exchange.
#[derive(Debug, Clone)]
pub struct GoogleProfile {
    pub email: String,
    pub email_verified: bool,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

/// Claims extracted from a validated Apple identity token.
///
/// `email_verified` is tri-state on purpose: Apple omits the claim entirely
/// when a user has changed their Apple ID email, and that case must not be
/// conflated with "present but false".
#[derive(Debug, Clone)]
pub struct AppleClaims {
    pub email: String,
    pub email_verified: Option<String>,
}

/// A user's membership on one project.
#[derive(Debug, Clone)]
pub struct ProjectRoleBinding {
    pub project_id: Uuid,
    pub role: ProjectRole,
}

/// Snapshot of a project the user created, read before deletion planning.
#[derive(Debug, Clone)]
pub struct CreatedProjectSummary {
    pub project_id: Uuid,
    pub name: String,
    pub status: ProjectStatus,
    pub total_entries: i64,
    pub featured: bool,
}

/// What account deletion will do, computed in full before any mutation and
/// then executed as a single transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionPlan {
    /// No project entanglement: remove the user row outright.
    HardDeleteUser,
    /// Member of projects but created none: the id may be referenced by
    /// historical entries, so keep the row and archive it.
    ArchiveUserOnly,
    /// Created projects: empty ones are removed, non-empty ones archived,
    /// then the user is archived.
    ArchiveCreated {
        delete_projects: Vec<Uuid>,
        archive_projects: Vec<Uuid>,
    },
}

/// Mail-dispatch event written to the outbox table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Unique non-routable address taking the place of an archived user's email,
/// releasing the uniqueness slot while the surrogate id stays valid.
pub fn tombstone_email(user_id: Uuid) -> String {
    format!("deleted-{user_id}@archived.invalid")
}
