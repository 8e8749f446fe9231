//! Signed-token fixtures for integration tests.
//!
//! Authenticated routes accept a bearer access token. `TestToken` mints one
//! signed with the test secret so no live login flow is needed in tests.

use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use uuid::Uuid;

/// Mirror of the identity service's JWT claim shape. Kept in sync by the
/// router tests that decode real responses.
#[derive(Serialize)]
struct Claims {
    sub: String,
    role: u8,
    exp: u64,
}

/// Configurable identity for test requests.
pub struct TestToken {
    pub user_id: Uuid,
    pub server_role: u8,
    /// Token lifetime in seconds from now (default 3600).
    pub ttl_secs: u64,
}

impl TestToken {
    pub fn new(user_id: Uuid, server_role: u8) -> Self {
        Self {
            user_id,
            server_role,
            ttl_secs: 3600,
        }
    }

    /// An already-expired token, for negative tests.
    pub fn expired(user_id: Uuid, server_role: u8) -> Self {
        Self {
            user_id,
            server_role,
            ttl_secs: 0,
        }
    }

    /// Encode a signed JWT with the given secret.
    pub fn jwt(&self, secret: &str) -> String {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        // ttl 0 means "expired well beyond any validation leeway"
        let exp = if self.ttl_secs == 0 {
            now.saturating_sub(600)
        } else {
            now + self.ttl_secs
        };
        let claims = Claims {
            sub: self.user_id.to_string(),
            role: self.server_role,
            exp,
        };
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    /// Headers carrying the token as `Authorization: Bearer ...`.
    pub fn bearer_headers(&self, secret: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {}", self.jwt(secret))).unwrap(),
        );
        map
    }
}
