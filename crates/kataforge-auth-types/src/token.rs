//! JWT session and verification token validation.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
use serde::Serialize;
use uuid::Uuid;

/// Session-token lifetime in seconds (7 days).
pub const SESSION_EXPIRATION: u64 = 604_800;

/// Verification-token lifetime in seconds (5 minutes).
pub const VERIFICATION_EXPIRATION: u64 = 300;

/// Errors returned by [`validate_token`] and its typed wrappers.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// What a verification token (and its paired code) authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
#[serde(rename_all = "snake_case")]
pub enum VerificationPurpose {
    TwoFactor,
    PasswordReset,
}

impl VerificationPurpose {
    /// Parse the wire string. Returns `None` for unknown values.
    pub fn from_str(v: &str) -> Option<Self> {
        match v {
            "two_factor" => Some(Self::TwoFactor),
            "password_reset" => Some(Self::PasswordReset),
            _ => None,
        }
    }

    /// Convert to the wire string, as stored in `verification_codes.purpose`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwoFactor => "two_factor",
            Self::PasswordReset => "password_reset",
        }
    }
}

/// Claims of a session token: a proven identity.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
pub struct SessionClaims {
    /// User ID (UUID string).
    pub sub: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// User role as wire string, see `kataforge_domain::user::UserRole`.
    pub role: String,
    /// Issued-at timestamp (seconds since UNIX epoch).
    pub iat: u64,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

impl SessionClaims {
    /// Parse the `sub` claim as a user ID.
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        self.sub.parse::<Uuid>().map_err(|_| TokenError::Malformed)
    }
}

/// Claims of a verification token: a pending two-factor or password-reset
/// attempt bound to a user and purpose.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
pub struct VerificationClaims {
    /// User ID (UUID string).
    pub sub: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub purpose: VerificationPurpose,
    /// Issued-at timestamp (seconds since UNIX epoch).
    pub iat: u64,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

impl VerificationClaims {
    /// Parse the `sub` claim as a user ID.
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        self.sub.parse::<Uuid>().map_err(|_| TokenError::Malformed)
    }
}

/// Tagged claim set shared by token creation (auth service) and validation
/// (everyone). The `use` claim discriminates the variant, so callers always
/// get a checked type rather than an untyped bag of fields.
///
/// # Feature gate
///
/// [`Deserialize`] is always available — all consumers validate tokens.
/// [`Serialize`] requires the **`USE_ONLY_IN_AUTH_SERVICE`** cargo feature.
/// Only the auth service enables it because it is the sole token issuer.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
#[serde(tag = "use", rename_all = "snake_case")]
pub enum TokenClaims {
    Session(SessionClaims),
    Verification(VerificationClaims),
}

// ── Core decode (private) ────────────────────────────────────────────────

/// Decode and validate a JWT, returning tagged claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s — tolerates clock skew between services.
fn decode_jwt(token: &str, secret: &str) -> Result<TokenClaims, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_) => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    Ok(data.claims)
}

// ── Public API ───────────────────────────────────────────────────────────

/// Validate a token and return its tagged claims.
///
/// Responses built from these errors must not distinguish forgery from
/// benign expiry to the end user; the variants exist for server-side logs.
pub fn validate_token(token: &str, secret: &str) -> Result<TokenClaims, TokenError> {
    decode_jwt(token, secret)
}

/// Validate a session-token cookie value.
///
/// The primary API for request gating: the access middleware calls this on
/// every non-public request. A verification token is rejected as malformed.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, TokenError> {
    match validate_token(token, secret)? {
        TokenClaims::Session(claims) => Ok(claims),
        TokenClaims::Verification(_) => Err(TokenError::Malformed),
    }
}

/// Validate a verification-token cookie value (2FA / password reset).
/// A session token is rejected as malformed.
pub fn validate_verification_token(
    token: &str,
    secret: &str,
) -> Result<VerificationClaims, TokenError> {
    match validate_token(token, secret)? {
        TokenClaims::Verification(claims) => Ok(claims),
        TokenClaims::Session(_) => Err(TokenError::Malformed),
    }
}
