use kataforge_auth_types::token::VerificationPurpose;

use crate::domain::repository::{UserRepository, VerificationCodeRepository};
use crate::email::Mailer;
use crate::error::AuthServiceError;
use crate::password::verify_password;
use crate::usecase::AuthOutcome;
use crate::usecase::code::begin_verification;
use crate::usecase::token::issue_session_token;

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub users: U,
    pub codes: C,
    pub mailer: Mailer,
    pub jwt_secret: String,
    /// Production policy: successful credentials start an emailed
    /// second-factor step instead of minting a session directly.
    pub two_factor: bool,
}

impl<U, C> LoginUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub async fn execute(&self, input: LoginInput) -> Result<AuthOutcome, AuthServiceError> {
        // Unknown email and wrong password collapse to the same error so the
        // response never confirms an account exists.
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthServiceError::AccountDisabled);
        }

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        if self.two_factor {
            let (verification_token, code_id) = begin_verification(
                &self.codes,
                &self.mailer,
                &user,
                VerificationPurpose::TwoFactor,
                &self.jwt_secret,
            )
            .await?;
            Ok(AuthOutcome::VerificationRequired {
                verification_token,
                code_id,
            })
        } else {
            let session_token = issue_session_token(&user, &self.jwt_secret)?;
            Ok(AuthOutcome::Session {
                user,
                session_token,
            })
        }
    }
}
