use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use kataforge_auth_types::token::VerificationPurpose;

use crate::domain::repository::VerificationCodeRepository;
use crate::domain::types::{AuthUser, VERIFICATION_CODE_TTL_SECS, VerificationCode};
use crate::email::{Mailer, send_verification_email};
use crate::error::AuthServiceError;
use crate::usecase::token::issue_verification_token;

/// Generate a uniform six-digit code, `100000..=999999`.
pub fn generate_verification_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000..=999_999).to_string()
}

/// Mint and persist a fresh code for `(user_id, purpose)`, displacing any
/// previous one. Returns the new row id and the plaintext code.
pub async fn issue_code<C>(
    codes: &C,
    user_id: Uuid,
    purpose: VerificationPurpose,
) -> Result<(Uuid, String), AuthServiceError>
where
    C: VerificationCodeRepository,
{
    let code_str = generate_verification_code();
    let now = Utc::now();
    let code = VerificationCode {
        id: Uuid::new_v4(),
        user_id,
        code: code_str.clone(),
        purpose,
        expires_at: now + Duration::seconds(VERIFICATION_CODE_TTL_SECS),
        created_at: now,
    };
    codes.replace_active(&code).await?;
    Ok((code.id, code_str))
}

/// Check a submitted code against the stored row.
///
/// Single-use: a match deletes the row before returning true. An expired row
/// is deleted on discovery. A mismatch leaves the row in place so the user
/// can retry until the 5-minute expiry.
pub async fn verify_code<C>(
    codes: &C,
    code_id: Uuid,
    submitted: &str,
) -> Result<bool, AuthServiceError>
where
    C: VerificationCodeRepository,
{
    let Some(stored) = codes.find_by_id(code_id).await? else {
        return Ok(false);
    };
    if stored.is_expired() {
        codes.delete(stored.id).await?;
        return Ok(false);
    }
    if stored.code != submitted {
        return Ok(false);
    }
    codes.delete(stored.id).await?;
    Ok(true)
}

/// Start a second-factor step for `user`: persist a fresh code, email it,
/// and sign the verification token the client will present alongside it.
/// Returns `(verification_token, code_id)` for the cookie pair.
pub async fn begin_verification<C>(
    codes: &C,
    mailer: &Mailer,
    user: &AuthUser,
    purpose: VerificationPurpose,
    jwt_secret: &str,
) -> Result<(String, Uuid), AuthServiceError>
where
    C: VerificationCodeRepository,
{
    let (code_id, code) = issue_code(codes, user.id, purpose).await?;
    send_verification_email(mailer, &user.email, &code, purpose).await?;
    let verification_token = issue_verification_token(user, purpose, jwt_secret)?;
    Ok((verification_token, code_id))
}
