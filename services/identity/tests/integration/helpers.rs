use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use fieldnote_domain::provider::ProviderKind;
use fieldnote_domain::user::{ServerRole, UserState};

use fieldnote_identity::domain::repository::{
    AppleVerifier, DirectoryPort, GoogleVerifier, OutboxPort, PasswordlessCodeStore, ProjectPort,
    ProviderLinkStore, UserStore,
};
use fieldnote_identity::domain::types::{
    AppleClaims, CODE_TTL_SECS, CreatedProjectSummary, DeletionPlan, DirectoryEntry,
    GoogleProfile, OutboxEvent, PasswordlessCode, ProjectRoleBinding, ProviderLink, User,
};
use fieldnote_identity::error::IdentityError;
use fieldnote_identity::provider::hash::hash_secret;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

// ── MockUserStore ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserStore {
    pub users: Arc<Mutex<Vec<User>>>,
    /// When set, the next `create` inserts this user instead and fails with
    /// `EmailAlreadyExists` — simulates losing the lookup-then-create race.
    pub race_winner: Arc<Mutex<Option<User>>>,
}

impl MockUserStore {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            race_winner: Arc::new(Mutex::new(None)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn with_race_winner(users: Vec<User>, winner: User) -> Self {
        let store = Self::new(users);
        *store.race_winner.lock().unwrap() = Some(winner);
        store
    }

    pub fn snapshot(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

impl UserStore for MockUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, IdentityError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), IdentityError> {
        if let Some(winner) = self.race_winner.lock().unwrap().take() {
            self.users.lock().unwrap().push(winner);
            return Err(IdentityError::EmailAlreadyExists);
        }
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(IdentityError::EmailAlreadyExists);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn activate(
        &self,
        id: Uuid,
        name: &str,
        last_name: &str,
    ) -> Result<(), IdentityError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.state = UserState::Active;
            u.name = name.to_owned();
            u.last_name = last_name.to_owned();
        }
        Ok(())
    }

    async fn update_names(
        &self,
        id: Uuid,
        name: &str,
        last_name: &str,
    ) -> Result<(), IdentityError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.name = name.to_owned();
            u.last_name = last_name.to_owned();
        }
        Ok(())
    }
}

// ── MockProviderLinkStore ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockProviderLinkStore {
    pub links: Arc<Mutex<Vec<ProviderLink>>>,
}

impl MockProviderLinkStore {
    pub fn new(links: Vec<ProviderLink>) -> Self {
        Self {
            links: Arc::new(Mutex::new(links)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn snapshot(&self) -> Vec<ProviderLink> {
        self.links.lock().unwrap().clone()
    }
}

impl ProviderLinkStore for MockProviderLinkStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ProviderLink>, IdentityError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn link_if_absent(&self, link: &ProviderLink) -> Result<(), IdentityError> {
        let mut links = self.links.lock().unwrap();
        if !links
            .iter()
            .any(|l| l.user_id == link.user_id && l.provider == link.provider)
        {
            links.push(link.clone());
        }
        Ok(())
    }
}

// ── MockCodeStore ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockCodeStore {
    pub codes: Arc<Mutex<Vec<PasswordlessCode>>>,
    pub outbox: Arc<Mutex<Vec<OutboxEvent>>>,
}

impl MockCodeStore {
    pub fn new(codes: Vec<PasswordlessCode>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(codes)),
            outbox: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn code_snapshot(&self) -> Vec<PasswordlessCode> {
        self.codes.lock().unwrap().clone()
    }

    pub fn outbox_snapshot(&self) -> Vec<OutboxEvent> {
        self.outbox.lock().unwrap().clone()
    }
}

impl PasswordlessCodeStore for MockCodeStore {
    async fn replace_with_outbox(
        &self,
        code: &PasswordlessCode,
        event: &OutboxEvent,
    ) -> Result<(), IdentityError> {
        let mut codes = self.codes.lock().unwrap();
        codes.retain(|c| c.email != code.email);
        codes.push(code.clone());
        self.outbox.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn find_live(&self, email: &str) -> Result<Option<PasswordlessCode>, IdentityError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.email == email && c.is_live())
            .cloned())
    }

    async fn consume(&self, email: &str) -> Result<bool, IdentityError> {
        let mut codes = self.codes.lock().unwrap();
        let before = codes.len();
        codes.retain(|c| c.email != email);
        Ok(codes.len() < before)
    }
}

// ── MockProjectPort ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockProjectPort {
    pub roles: Vec<ProjectRoleBinding>,
    pub summaries: Vec<CreatedProjectSummary>,
    pub fail_apply: bool,
    pub applied: Arc<Mutex<Vec<DeletionPlan>>>,
}

impl MockProjectPort {
    pub fn new(roles: Vec<ProjectRoleBinding>, summaries: Vec<CreatedProjectSummary>) -> Self {
        Self {
            roles,
            summaries,
            fail_apply: false,
            applied: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn failing(roles: Vec<ProjectRoleBinding>, summaries: Vec<CreatedProjectSummary>) -> Self {
        Self {
            fail_apply: true,
            ..Self::new(roles, summaries)
        }
    }

    pub fn applied_plans(&self) -> Vec<DeletionPlan> {
        self.applied.lock().unwrap().clone()
    }
}

impl ProjectPort for MockProjectPort {
    async fn roles_for_user(
        &self,
        _user_id: Uuid,
    ) -> Result<Vec<ProjectRoleBinding>, IdentityError> {
        Ok(self.roles.clone())
    }

    async fn created_project_summaries(
        &self,
        _user_id: Uuid,
    ) -> Result<Vec<CreatedProjectSummary>, IdentityError> {
        Ok(self.summaries.clone())
    }

    async fn apply_deletion_plan(
        &self,
        _user_id: Uuid,
        plan: &DeletionPlan,
    ) -> Result<(), IdentityError> {
        if self.fail_apply {
            return Err(IdentityError::Internal(anyhow::anyhow!(
                "simulated transaction failure"
            )));
        }
        self.applied.lock().unwrap().push(plan.clone());
        Ok(())
    }
}

// ── MockOutbox ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockOutbox {
    pub events: Arc<Mutex<Vec<OutboxEvent>>>,
    pub fail: bool,
}

impl MockOutbox {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(vec![])),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn snapshot(&self) -> Vec<OutboxEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl OutboxPort for MockOutbox {
    async fn enqueue(&self, event: &OutboxEvent) -> Result<(), IdentityError> {
        if self.fail {
            return Err(IdentityError::Internal(anyhow::anyhow!(
                "simulated mail outage"
            )));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// ── Mock external verifiers ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockGoogle {
    pub profile: GoogleProfile,
}

impl GoogleVerifier for MockGoogle {
    async fn exchange_code(&self, _code: &str) -> Result<GoogleProfile, IdentityError> {
        Ok(self.profile.clone())
    }
}

#[derive(Clone)]
pub struct MockApple {
    pub claims: AppleClaims,
}

impl AppleVerifier for MockApple {
    async fn verify_identity_token(&self, _token: &str) -> Result<AppleClaims, IdentityError> {
        Ok(self.claims.clone())
    }
}

#[derive(Clone)]
pub struct MockDirectory {
    pub entry: Option<DirectoryEntry>,
    pub unavailable: bool,
}

impl DirectoryPort for MockDirectory {
    async fn bind(
        &self,
        _username: &str,
        _password: &str,
    ) -> Result<DirectoryEntry, IdentityError> {
        if self.unavailable {
            return Err(IdentityError::DirectoryUnavailable);
        }
        self.entry
            .clone()
            .ok_or(IdentityError::InvalidCredentials)
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn active_user(email: &str, name: &str) -> User {
    User {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        name: name.to_owned(),
        last_name: String::new(),
        server_role: ServerRole::Basic,
        state: UserState::Active,
        password_hash: None,
        created_at: Utc::now(),
    }
}

pub fn user_with_state(email: &str, state: UserState) -> User {
    User {
        state,
        ..active_user(email, "")
    }
}

pub fn local_user(email: &str, password: &str) -> User {
    User {
        password_hash: Some(hash_secret(password).unwrap()),
        ..active_user(email, "Ada")
    }
}

pub fn link(user: &User, provider: ProviderKind) -> ProviderLink {
    ProviderLink::new(user.id, provider, user.email.clone())
}

pub fn stored_code(email: &str, code: &str) -> PasswordlessCode {
    PasswordlessCode {
        email: email.to_owned(),
        code_hash: hash_secret(code).unwrap(),
        expires_at: Utc::now() + chrono::Duration::seconds(CODE_TTL_SECS),
        created_at: Utc::now(),
    }
}

pub fn expired_code(email: &str, code: &str) -> PasswordlessCode {
    PasswordlessCode {
        expires_at: Utc::now() - chrono::Duration::seconds(1),
        ..stored_code(email, code)
    }
}
