//! Session fixtures for integration tests.
//!
//! Requests gated by the access middleware need a valid `session_token`
//! cookie. `SessionFixture` mints one signed with the test secret, so tests
//! exercise the real validation path instead of bypassing it.

use http::{HeaderName, HeaderValue, header};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use kataforge_auth_types::cookie::SESSION_TOKEN;
use kataforge_auth_types::token::{SessionClaims, TokenClaims};

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn encode_session(claims: SessionClaims, secret: &str) -> String {
    encode(
        &Header::default(),
        &TokenClaims::Session(claims),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// A test identity with a mintable session cookie.
pub struct SessionFixture {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
}

impl SessionFixture {
    /// A fresh identity with the given role and a random user id.
    pub fn new(role: &str) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            email: "jane@example.com".to_string(),
            name: Some("Jane".to_string()),
            role: role.to_string(),
        }
    }

    /// Mint a session token valid for one hour.
    pub fn token(&self, secret: &str) -> String {
        let iat = now_secs();
        encode_session(
            SessionClaims {
                sub: self.user_id.to_string(),
                email: self.email.clone(),
                name: self.name.clone(),
                role: self.role.clone(),
                iat,
                exp: iat + 3600,
            },
            secret,
        )
    }

    /// Build the `Cookie` request header carrying the session token.
    pub fn cookie_header(&self, secret: &str) -> (HeaderName, HeaderValue) {
        let value = format!("{SESSION_TOKEN}={}", self.token(secret));
        (header::COOKIE, HeaderValue::from_str(&value).unwrap())
    }
}

/// Mint a session token whose expiry is already in the past (beyond leeway).
pub fn expired_session_token(secret: &str) -> String {
    encode_session(
        SessionClaims {
            sub: Uuid::new_v4().to_string(),
            email: "jane@example.com".to_string(),
            name: None,
            role: "student".to_string(),
            iat: 1_000_000,
            exp: 1_000_300,
        },
        secret,
    )
}
