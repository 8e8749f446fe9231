use chrono::{Duration, Utc};
use rand::RngExt;
use serde_json::json;
use uuid::Uuid;

use fieldnote_domain::email::{looks_like_email, normalize_email};

use crate::domain::repository::PasswordlessCodeStore;
use crate::domain::types::{CODE_LEN, CODE_TTL_SECS, OutboxEvent, PasswordlessCode};
use crate::error::IdentityError;
use crate::provider::hash::hash_secret;

/// Numeric charset for 6-digit login codes.
const CHARSET: &[u8] = b"0123456789";

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

pub struct SendCodeInput {
    pub email: String,
}

/// Create (or replace) the one live passwordless code for an email and
/// enqueue the code mail in the same transaction.
///
/// The same code channel doubles as the generic "prove you own this inbox"
/// step for cross-provider linking, so sending is open to any plausible
/// address — the account may not exist yet.
pub struct SendCodeUseCase<C: PasswordlessCodeStore> {
    pub codes: C,
}

impl<C: PasswordlessCodeStore> SendCodeUseCase<C> {
    pub async fn execute(&self, input: SendCodeInput) -> Result<(), IdentityError> {
        let email = normalize_email(&input.email);
        if !looks_like_email(&email) {
            return Err(IdentityError::InvalidCredentials);
        }

        let code = generate_code();
        let now = Utc::now();
        let record = PasswordlessCode {
            email: email.clone(),
            code_hash: hash_secret(&code)?,
            expires_at: now + Duration::seconds(CODE_TTL_SECS),
            created_at: now,
        };

        let event = OutboxEvent {
            id: Uuid::new_v4(),
            kind: "passwordless_code_created".to_owned(),
            payload: json!({ "email": email, "code": code }),
            idempotency_key: format!("passwordless_code_created:{}", Uuid::new_v4()),
        };

        // Atomic replace: afterwards exactly one live code exists for the
        // address, and the mail event rides the same transaction.
        self.codes.replace_with_outbox(&record, &event).await
    }
}
