use fieldnote_identity::domain::repository::PasswordlessCodeStore;
use fieldnote_identity::error::IdentityError;
use fieldnote_identity::provider::passwordless::PasswordlessAdapter;
use fieldnote_identity::usecase::passwordless::{SendCodeInput, SendCodeUseCase};

use crate::helpers::{MockCodeStore, expired_code, stored_code};

#[tokio::test]
async fn should_store_hashed_code_and_enqueue_mail() {
    let codes = MockCodeStore::empty();
    let uc = SendCodeUseCase {
        codes: codes.clone(),
    };

    uc.execute(SendCodeInput {
        email: "Ada@X.com ".to_owned(),
    })
    .await
    .unwrap();

    let stored = codes.code_snapshot();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].email, "ada@x.com");
    assert!(stored[0].is_live());
    // hashed, never plaintext
    assert!(stored[0].code_hash.starts_with("$argon2"));

    let outbox = codes.outbox_snapshot();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].kind, "passwordless_code_created");
    assert_eq!(outbox[0].payload["email"], "ada@x.com");
}

#[tokio::test]
async fn should_replace_prior_code_leaving_exactly_one_live() {
    let codes = MockCodeStore::new(vec![stored_code("a@x.com", "111111")]);
    let uc = SendCodeUseCase {
        codes: codes.clone(),
    };

    uc.execute(SendCodeInput {
        email: "a@x.com".to_owned(),
    })
    .await
    .unwrap();

    let stored = codes.code_snapshot();
    assert_eq!(stored.len(), 1, "old code must be superseded");
    // the replacement is a different hash than the old code's
    assert!(!fieldnote_identity::provider::hash::verify_secret(
        "111111",
        &stored[0].code_hash
    ));
}

#[tokio::test]
async fn should_reject_implausible_email() {
    let codes = MockCodeStore::empty();
    let uc = SendCodeUseCase {
        codes: codes.clone(),
    };

    let result = uc
        .execute(SendCodeInput {
            email: "not-an-email".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    assert!(codes.code_snapshot().is_empty());
    assert!(codes.outbox_snapshot().is_empty());
}

#[tokio::test]
async fn should_accept_code_only_once() {
    let codes = MockCodeStore::new(vec![stored_code("a@x.com", "123456")]);
    let adapter = PasswordlessAdapter {
        codes: codes.clone(),
    };

    adapter.verify("a@x.com", "123456", None).await.unwrap();

    // replay of the identical code: consumed, so "not found"
    let replay = adapter.verify("a@x.com", "123456", None).await;
    assert!(matches!(replay, Err(IdentityError::InvalidCredentials)));
}

#[tokio::test]
async fn should_reject_expired_code() {
    let codes = MockCodeStore::new(vec![expired_code("a@x.com", "123456")]);
    let adapter = PasswordlessAdapter {
        codes: codes.clone(),
    };

    let result = adapter.verify("a@x.com", "123456", None).await;
    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
}

#[tokio::test]
async fn should_ignore_expired_code_in_find_live() {
    let codes = MockCodeStore::new(vec![expired_code("a@x.com", "123456")]);
    assert!(codes.find_live("a@x.com").await.unwrap().is_none());
}
