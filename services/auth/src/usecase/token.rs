use jsonwebtoken::{EncodingKey, Header, encode};
use std::time::{SystemTime, UNIX_EPOCH};

use kataforge_auth_types::token::{
    SESSION_EXPIRATION, SessionClaims, TokenClaims, VERIFICATION_EXPIRATION, VerificationClaims,
    VerificationPurpose,
};

use crate::domain::types::AuthUser;
use crate::error::AuthServiceError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

fn sign(claims: &TokenClaims, secret: &str) -> Result<String, AuthServiceError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))
}

/// Sign a session token for an authenticated user. Expires in 7 days.
pub fn issue_session_token(user: &AuthUser, secret: &str) -> Result<String, AuthServiceError> {
    let iat = now_secs();
    sign(
        &TokenClaims::Session(SessionClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
            iat,
            exp: iat + SESSION_EXPIRATION,
        }),
        secret,
    )
}

/// Sign a verification token binding a pending two-factor or password-reset
/// attempt to the user. Expires in 5 minutes, like its paired code.
pub fn issue_verification_token(
    user: &AuthUser,
    purpose: VerificationPurpose,
    secret: &str,
) -> Result<String, AuthServiceError> {
    let iat = now_secs();
    sign(
        &TokenClaims::Verification(VerificationClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            purpose,
            iat,
            exp: iat + VERIFICATION_EXPIRATION,
        }),
        secret,
    )
}
