use std::collections::HashMap;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, SqlErr, TransactionTrait, sea_query::OnConflict,
};
use uuid::Uuid;

use fieldnote_domain::project::{ProjectRole, ProjectStatus};
use fieldnote_domain::provider::ProviderKind;
use fieldnote_domain::user::{ServerRole, UserState};
use fieldnote_identity_schema::{
    outbox_events, passwordless_codes, project_roles, project_stats, projects, provider_links,
    users,
};

use crate::domain::repository::{
    OutboxPort, PasswordlessCodeStore, ProjectPort, ProviderLinkStore, UserStore,
};
use crate::domain::types::{
    CreatedProjectSummary, DeletionPlan, OutboxEvent, PasswordlessCode, ProjectRoleBinding,
    ProviderLink, User, tombstone_email,
};
use crate::error::IdentityError;

// ── User store ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserStore {
    pub db: DatabaseConnection,
}

impl UserStore for DbUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, IdentityError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), IdentityError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            last_name: Set(user.last_name.clone()),
            server_role: Set(user.server_role.as_i16()),
            state: Set(user.state.as_i16()),
            password_hash: Set(user.password_hash.clone()),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            // The unique index on email decides creation races; the loser
            // sees this and retries as an existing-user login.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(IdentityError::EmailAlreadyExists)
            }
            Err(e) => Err(IdentityError::Internal(
                anyhow::Error::new(e).context("create user"),
            )),
        }
    }

    async fn activate(
        &self,
        id: Uuid,
        name: &str,
        last_name: &str,
    ) -> Result<(), IdentityError> {
        users::ActiveModel {
            id: Set(id),
            state: Set(UserState::Active.as_i16()),
            name: Set(name.to_owned()),
            last_name: Set(last_name.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("activate user")?;
        Ok(())
    }

    async fn update_names(
        &self,
        id: Uuid,
        name: &str,
        last_name: &str,
    ) -> Result<(), IdentityError> {
        users::ActiveModel {
            id: Set(id),
            name: Set(name.to_owned()),
            last_name: Set(last_name.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user names")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> Result<User, IdentityError> {
    let server_role = ServerRole::from_i16(model.server_role)
        .ok_or_else(|| anyhow::anyhow!("unknown server_role wire value: {}", model.server_role))?;
    let state = UserState::from_i16(model.state)
        .ok_or_else(|| anyhow::anyhow!("unknown user state wire value: {}", model.state))?;
    Ok(User {
        id: model.id,
        email: model.email,
        name: model.name,
        last_name: model.last_name,
        server_role,
        state,
        password_hash: model.password_hash,
        created_at: model.created_at,
    })
}

// ── Provider link store ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProviderLinkStore {
    pub db: DatabaseConnection,
}

impl ProviderLinkStore for DbProviderLinkStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ProviderLink>, IdentityError> {
        let models = provider_links::Entity::find()
            .filter(provider_links::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .context("list provider links")?;
        models.into_iter().map(link_from_model).collect()
    }

    async fn link_if_absent(&self, link: &ProviderLink) -> Result<(), IdentityError> {
        let am = provider_links::ActiveModel {
            user_id: Set(link.user_id),
            provider: Set(link.provider.as_str().to_owned()),
            email: Set(link.email.clone()),
            created_at: Set(link.created_at),
        };
        let result = provider_links::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([
                    provider_links::Column::UserId,
                    provider_links::Column::Provider,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(&self.db)
            .await;

        match result {
            Ok(_) => Ok(()),
            // DO NOTHING inserted no row: the link already existed.
            Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(IdentityError::Internal(
                anyhow::Error::new(e).context("link provider"),
            )),
        }
    }
}

fn link_from_model(model: provider_links::Model) -> Result<ProviderLink, IdentityError> {
    let provider = model
        .provider
        .parse::<ProviderKind>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(ProviderLink {
        user_id: model.user_id,
        provider,
        email: model.email,
        created_at: model.created_at,
    })
}

// ── Passwordless code store ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPasswordlessCodeStore {
    pub db: DatabaseConnection,
}

impl PasswordlessCodeStore for DbPasswordlessCodeStore {
    async fn replace_with_outbox(
        &self,
        code: &PasswordlessCode,
        event: &OutboxEvent,
    ) -> Result<(), IdentityError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let code = code.clone();
                let event = event.clone();
                Box::pin(async move {
                    passwordless_codes::Entity::delete_many()
                        .filter(passwordless_codes::Column::Email.eq(code.email.clone()))
                        .exec(txn)
                        .await?;
                    passwordless_codes::ActiveModel {
                        email: Set(code.email.clone()),
                        code_hash: Set(code.code_hash.clone()),
                        expires_at: Set(code.expires_at),
                        created_at: Set(code.created_at),
                    }
                    .insert(txn)
                    .await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("replace passwordless code with outbox")?;
        Ok(())
    }

    async fn find_live(&self, email: &str) -> Result<Option<PasswordlessCode>, IdentityError> {
        let now = Utc::now();
        let model = passwordless_codes::Entity::find_by_id(email.to_owned())
            .filter(passwordless_codes::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find live passwordless code")?;
        Ok(model.map(|m| PasswordlessCode {
            email: m.email,
            code_hash: m.code_hash,
            expires_at: m.expires_at,
            created_at: m.created_at,
        }))
    }

    async fn consume(&self, email: &str) -> Result<bool, IdentityError> {
        let result = passwordless_codes::Entity::delete_many()
            .filter(passwordless_codes::Column::Email.eq(email))
            .exec(&self.db)
            .await
            .context("consume passwordless code")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Outbox ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOutboxStore {
    pub db: DatabaseConnection,
}

impl OutboxPort for DbOutboxStore {
    async fn enqueue(&self, event: &OutboxEvent) -> Result<(), IdentityError> {
        let now = Utc::now();
        outbox_events::ActiveModel {
            id: Set(event.id),
            kind: Set(event.kind.clone()),
            payload: Set(event.payload.clone()),
            idempotency_key: Set(event.idempotency_key.clone()),
            attempts: Set(0),
            last_error: Set(None),
            created_at: Set(now),
            next_attempt_at: Set(now),
            processed_at: Set(None),
            failed_at: Set(None),
        }
        .insert(&self.db)
        .await
        .context("enqueue outbox event")?;
        Ok(())
    }
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

// ── Project port ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProjectStore {
    pub db: DatabaseConnection,
}

impl ProjectPort for DbProjectStore {
    async fn roles_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ProjectRoleBinding>, IdentityError> {
        let models = project_roles::Entity::find()
            .filter(project_roles::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .context("list project roles")?;
        models
            .into_iter()
            .map(|m| {
                let role = m
                    .role
                    .parse::<ProjectRole>()
                    .map_err(|e| anyhow::anyhow!("{e}"))?;
                Ok(ProjectRoleBinding {
                    project_id: m.project_id,
                    role,
                })
            })
            .collect()
    }

    async fn created_project_summaries(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CreatedProjectSummary>, IdentityError> {
        let role_rows = project_roles::Entity::find()
            .filter(project_roles::Column::UserId.eq(user_id))
            .filter(project_roles::Column::Role.eq(ProjectRole::Creator.as_str()))
            .all(&self.db)
            .await
            .context("list created-project roles")?;
        let ids: Vec<Uuid> = role_rows.iter().map(|r| r.project_id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let project_rows = projects::Entity::find()
            .filter(projects::Column::Id.is_in(ids.clone()))
            .all(&self.db)
            .await
            .context("load created projects")?;
        let stat_rows = project_stats::Entity::find()
            .filter(project_stats::Column::ProjectId.is_in(ids))
            .all(&self.db)
            .await
            .context("load created project stats")?;
        let entries: HashMap<Uuid, i64> = stat_rows
            .into_iter()
            .map(|s| (s.project_id, s.total_entries))
            .collect();

        project_rows
            .into_iter()
            .map(|p| {
                let status = ProjectStatus::from_i16(p.status).ok_or_else(|| {
                    anyhow::anyhow!("unknown project status wire value: {}", p.status)
                })?;
                Ok(CreatedProjectSummary {
                    project_id: p.id,
                    name: p.name,
                    status,
                    total_entries: entries.get(&p.id).copied().unwrap_or(0),
                    featured: p.featured,
                })
            })
            .collect()
    }

    async fn apply_deletion_plan(
        &self,
        user_id: Uuid,
        plan: &DeletionPlan,
    ) -> Result<(), IdentityError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let plan = plan.clone();
                Box::pin(async move {
                    match plan {
                        DeletionPlan::HardDeleteUser => {
                            // provider links cascade with the row
                            users::Entity::delete_by_id(user_id).exec(txn).await?;
                        }
                        DeletionPlan::ArchiveUserOnly => {
                            archive_user(txn, user_id).await?;
                        }
                        DeletionPlan::ArchiveCreated {
                            delete_projects,
                            archive_projects,
                        } => {
                            for project_id in delete_projects {
                                // roles and stats cascade with the project
                                projects::Entity::delete_by_id(project_id).exec(txn).await?;
                            }
                            for project_id in archive_projects {
                                projects::ActiveModel {
                                    id: Set(project_id),
                                    status: Set(ProjectStatus::Archived.as_i16()),
                                    ..Default::default()
                                }
                                .update(txn)
                                .await?;
                            }
                            archive_user(txn, user_id).await?;
                        }
                    }
                    Ok(())
                })
            })
            .await
            .context("apply account deletion plan")?;
        Ok(())
    }
}

/// Archive a user in-place: state change plus email tombstone. The row (and
/// its id) survives for historical references; the email slot is released.
async fn archive_user(txn: &DatabaseTransaction, user_id: Uuid) -> Result<(), DbErr> {
    users::ActiveModel {
        id: Set(user_id),
        state: Set(UserState::Archived.as_i16()),
        email: Set(tombstone_email(user_id)),
        name: Set(String::new()),
        last_name: Set(String::new()),
        password_hash: Set(None),
        ..Default::default()
    }
    .update(txn)
    .await?;
    Ok(())
}
