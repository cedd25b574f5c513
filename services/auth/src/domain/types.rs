use chrono::{DateTime, Utc};
use uuid::Uuid;

use kataforge_auth_types::token::VerificationPurpose;

/// Full account record as the auth flows see it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    /// Role wire string, see `kataforge_domain::user::UserRole`.
    pub role: String,
    pub is_active: bool,
}

/// Six-digit single-use code backing a pending two-factor or reset attempt.
#[derive(Debug, Clone)]
pub struct VerificationCode {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code: String,
    pub purpose: VerificationPurpose,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl VerificationCode {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Verification-code length in digits.
pub const VERIFICATION_CODE_LEN: usize = 6;

/// Verification-code time-to-live in seconds.
pub const VERIFICATION_CODE_TTL_SECS: i64 = 300;
