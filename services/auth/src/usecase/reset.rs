use uuid::Uuid;

use kataforge_auth_types::token::{VerificationClaims, VerificationPurpose};

use crate::domain::repository::{UserRepository, VerificationCodeRepository};
use crate::email::Mailer;
use crate::error::AuthServiceError;
use crate::password::hash_password;
use crate::usecase::code::{begin_verification, verify_code};

// ── Request a reset code ─────────────────────────────────────────────────────

pub struct RequestResetUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub users: U,
    pub codes: C,
    pub mailer: Mailer,
    pub jwt_secret: String,
}

impl<U, C> RequestResetUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    /// Returns `Some((verification_token, code_id))` when a code was minted
    /// and emailed, `None` when the account is unknown or inactive. The
    /// handler responds identically in both cases so the endpoint never
    /// confirms whether an email is registered.
    pub async fn execute(&self, email: &str) -> Result<Option<(String, Uuid)>, AuthServiceError> {
        let Some(user) = self.users.find_by_email(email).await?.filter(|u| u.is_active) else {
            return Ok(None);
        };

        let pair = begin_verification(
            &self.codes,
            &self.mailer,
            &user,
            VerificationPurpose::PasswordReset,
            &self.jwt_secret,
        )
        .await?;
        Ok(Some(pair))
    }
}

// ── Complete the reset ───────────────────────────────────────────────────────

pub struct CompleteResetInput {
    /// Claims of the already-validated verification token; the handler has
    /// confirmed `purpose == PasswordReset`.
    pub claims: VerificationClaims,
    pub code_id: Uuid,
    pub code: String,
    pub new_password: String,
}

pub struct CompleteResetUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub users: U,
    pub codes: C,
}

impl<U, C> CompleteResetUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub async fn execute(&self, input: CompleteResetInput) -> Result<(), AuthServiceError> {
        if !verify_code(&self.codes, input.code_id, &input.code).await? {
            return Err(AuthServiceError::InvalidCode);
        }

        let user_id = input
            .claims
            .user_id()
            .map_err(|_| AuthServiceError::SessionExpired)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthServiceError::UserNotFound)?;

        let password_hash = hash_password(&input.new_password)?;
        self.users.update_password_hash(user.id, &password_hash).await?;
        Ok(())
    }
}
