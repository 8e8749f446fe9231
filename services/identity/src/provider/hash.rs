//! Argon2 hashing for passwords and passwordless codes.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::IdentityError;

/// Hash a secret (password or one-time code) with Argon2id and a fresh salt.
pub fn hash_secret(raw: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| IdentityError::Internal(anyhow::anyhow!("hash secret: {e}")))
}

/// Verify a secret against a stored Argon2 hash. A malformed stored hash
/// verifies as false rather than erroring — the caller only needs yes/no.
pub fn verify_secret(raw: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(raw.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
