use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use fieldnote_auth_types::cookie::clear_cookies;

use crate::error::IdentityError;
use crate::handlers::envelope::Envelope;
use crate::handlers::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::account::DeleteAccountUseCase;

#[derive(Serialize)]
pub struct DeletionData {
    pub deleted: bool,
    /// "queued" normally; "failed" when the confirmation mail could not be
    /// enqueued (the deletion itself stands).
    pub confirmation_email: &'static str,
}

fn deletion_body(confirmation_queued: bool) -> Envelope<DeletionData> {
    Envelope::data(DeletionData {
        deleted: true,
        confirmation_email: if confirmation_queued { "queued" } else { "failed" },
    })
}

// ── DELETE /account (web) ─────────────────────────────────────────────────────

/// Web deletion additionally invalidates the current session: both token
/// cookies are cleared so the browser holds no credentials for the removed
/// identity.
pub async fn delete_account_web(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
) -> Result<impl IntoResponse, IdentityError> {
    let usecase = DeleteAccountUseCase {
        users: state.user_store(),
        projects: state.project_store(),
        outbox: state.outbox_store(),
    };
    let out = usecase.execute(current.user_id).await?;

    let jar = clear_cookies(jar, state.cookie_domain.clone());
    Ok((
        StatusCode::OK,
        jar,
        Json(deletion_body(out.confirmation_queued)),
    ))
}

// ── POST /account/deletion (mobile) ───────────────────────────────────────────

/// Mobile clients authenticate with a bearer token and manage their own
/// token storage; there is no cookie session to clear.
pub async fn delete_account_mobile(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<impl IntoResponse, IdentityError> {
    let usecase = DeleteAccountUseCase {
        users: state.user_store(),
        projects: state.project_store(),
        outbox: state.outbox_store(),
    };
    let out = usecase.execute(current.user_id).await?;
    Ok((StatusCode::OK, Json(deletion_body(out.confirmation_queued))))
}
