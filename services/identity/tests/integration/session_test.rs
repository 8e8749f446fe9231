use fieldnote_auth_types::token::validate_access_token;
use fieldnote_domain::user::{ServerRole, UserState};

use fieldnote_identity::error::IdentityError;
use fieldnote_identity::usecase::session::{RefreshSessionUseCase, issue_session};

use crate::helpers::{MockUserStore, TEST_JWT_SECRET, active_user, user_with_state};

#[tokio::test]
async fn should_issue_tokens_that_validate() {
    let user = fieldnote_identity::domain::types::User {
        server_role: ServerRole::Admin,
        ..active_user("ada@x.com", "Ada")
    };

    let tokens = issue_session(&user, TEST_JWT_SECRET).unwrap();

    let info = validate_access_token(&tokens.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user.id);
    assert_eq!(info.server_role, 1);
    assert_eq!(info.access_token_exp, tokens.access_token_exp);
}

#[tokio::test]
async fn should_rotate_session_on_refresh() {
    let user = active_user("ada@x.com", "Ada");
    let tokens = issue_session(&user, TEST_JWT_SECRET).unwrap();
    let uc = RefreshSessionUseCase {
        users: MockUserStore::new(vec![user.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = uc.execute(&tokens.refresh_token).await.unwrap();

    assert_eq!(out.user_id, user.id);
    let info = validate_access_token(&out.tokens.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user.id);
}

#[tokio::test]
async fn should_reject_garbage_refresh_token() {
    let uc = RefreshSessionUseCase {
        users: MockUserStore::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc.execute("not-a-jwt").await;
    assert!(matches!(result, Err(IdentityError::InvalidRefreshToken)));
}

#[tokio::test]
async fn should_reject_refresh_for_unknown_user() {
    let user = active_user("ada@x.com", "Ada");
    let tokens = issue_session(&user, TEST_JWT_SECRET).unwrap();
    let uc = RefreshSessionUseCase {
        users: MockUserStore::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc.execute(&tokens.refresh_token).await;
    assert!(matches!(result, Err(IdentityError::InvalidRefreshToken)));
}

#[tokio::test]
async fn should_reject_refresh_for_archived_user() {
    let mut user = user_with_state("gone@x.com", UserState::Archived);
    user.name = "Gone".to_owned();
    let tokens = issue_session(&user, TEST_JWT_SECRET).unwrap();
    let uc = RefreshSessionUseCase {
        users: MockUserStore::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    // a refresh token minted before archival must not revive the session
    let result = uc.execute(&tokens.refresh_token).await;
    assert!(matches!(result, Err(IdentityError::InvalidRefreshToken)));
}

#[tokio::test]
async fn should_reject_refresh_for_disabled_user() {
    let user = user_with_state("off@x.com", UserState::Disabled);
    let tokens = issue_session(&user, TEST_JWT_SECRET).unwrap();
    let uc = RefreshSessionUseCase {
        users: MockUserStore::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc.execute(&tokens.refresh_token).await;
    assert!(matches!(result, Err(IdentityError::InvalidRefreshToken)));
}
