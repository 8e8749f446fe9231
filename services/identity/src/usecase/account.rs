//! Account deletion: hard-delete when safe, archive when referential
//! integrity requires the surrogate id to stay valid.
//!
//! A reused id could silently attribute historical entries to an unrelated
//! future user, so any account entangled with project data is archived, not
//! removed. The whole plan — project deletes/archives plus the user
//! mutation — executes as one transaction; partial failure leaves
//! everything untouched.

use serde_json::json;
use uuid::Uuid;

use fieldnote_domain::project::ProjectRole;

use crate::domain::repository::{OutboxPort, ProjectPort, UserStore};
use crate::domain::types::{CreatedProjectSummary, DeletionPlan, OutboxEvent, ProjectRoleBinding};
use crate::error::IdentityError;

/// Decide what deletion will do, before any mutation.
pub fn compute_deletion_plan(
    roles: &[ProjectRoleBinding],
    created: &[CreatedProjectSummary],
) -> Result<DeletionPlan, IdentityError> {
    if roles.is_empty() {
        return Ok(DeletionPlan::HardDeleteUser);
    }
    if created.is_empty() {
        return Ok(DeletionPlan::ArchiveUserOnly);
    }
    if created.iter().any(|p| p.featured) {
        return Err(IdentityError::FeaturedProjectConflict);
    }

    let (empty, non_empty): (Vec<_>, Vec<_>) =
        created.iter().partition(|p| p.total_entries == 0);
    Ok(DeletionPlan::ArchiveCreated {
        delete_projects: empty.iter().map(|p| p.project_id).collect(),
        archive_projects: non_empty.iter().map(|p| p.project_id).collect(),
    })
}

#[derive(Debug)]
pub struct DeleteAccountOutput {
    pub plan: DeletionPlan,
    /// False when the confirmation mail could not be enqueued; the deletion
    /// itself has already committed and stands.
    pub confirmation_queued: bool,
}

pub struct DeleteAccountUseCase<U, P, O>
where
    U: UserStore,
    P: ProjectPort,
    O: OutboxPort,
{
    pub users: U,
    pub projects: P,
    pub outbox: O,
}

impl<U, P, O> DeleteAccountUseCase<U, P, O>
where
    U: UserStore,
    P: ProjectPort,
    O: OutboxPort,
{
    pub async fn execute(&self, user_id: Uuid) -> Result<DeleteAccountOutput, IdentityError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(IdentityError::UserNotFound)?;
        // captured before the plan runs: archival tombstones the stored email
        let email = user.email.clone();

        let roles = self.projects.roles_for_user(user_id).await?;
        let created = if roles.iter().any(|r| r.role == ProjectRole::Creator) {
            self.projects.created_project_summaries(user_id).await?
        } else {
            Vec::new()
        };

        let plan = compute_deletion_plan(&roles, &created)?;

        if let Err(e) = self.projects.apply_deletion_plan(user_id, &plan).await {
            // Full rollback already happened at the storage layer. The
            // caller gets the generic code; the cause goes to the log only.
            tracing::error!(error = %e, %user_id, "account deletion transaction failed");
            return Err(IdentityError::ArchiveFailed);
        }

        let event = OutboxEvent {
            id: Uuid::new_v4(),
            kind: "account_deletion_confirmed".to_owned(),
            payload: json!({ "email": email }),
            idempotency_key: format!("account_deletion_confirmed:{user_id}"),
        };
        let confirmation_queued = match self.outbox.enqueue(&event).await {
            Ok(()) => true,
            Err(e) => {
                // Best effort: mail failure never undoes the deletion.
                tracing::warn!(error = %e, %user_id, code = "ec5_116",
                    "failed to enqueue deletion confirmation mail");
                false
            }
        };

        Ok(DeleteAccountOutput {
            plan,
            confirmation_queued,
        })
    }
}
