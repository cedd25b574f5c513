use uuid::Uuid;

use kataforge_auth_types::token::VerificationClaims;

use crate::domain::repository::{UserRepository, VerificationCodeRepository};
use crate::domain::types::AuthUser;
use crate::error::AuthServiceError;
use crate::usecase::code::verify_code;
use crate::usecase::token::issue_session_token;

pub struct VerifyCodeInput {
    /// Claims of the already-validated verification token.
    pub claims: VerificationClaims,
    /// Row id from the `verification_id` cookie.
    pub code_id: Uuid,
    /// The six digits the user typed.
    pub code: String,
}

#[derive(Debug)]
pub struct VerifyCodeOutput {
    pub user: AuthUser,
    pub session_token: String,
}

pub struct VerifyCodeUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub users: U,
    pub codes: C,
    pub jwt_secret: String,
}

impl<U, C> VerifyCodeUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub async fn execute(&self, input: VerifyCodeInput) -> Result<VerifyCodeOutput, AuthServiceError> {
        if !verify_code(&self.codes, input.code_id, &input.code).await? {
            return Err(AuthServiceError::InvalidCode);
        }

        // Re-fetch: the account may have been deactivated since the token
        // was minted, and the session must carry current profile fields.
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

        let session_token = issue_session_token(&user, &self.jwt_secret)?;
        Ok(VerifyCodeOutput {
            user,
            session_token,
        })
    }
}
