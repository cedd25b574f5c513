use uuid::Uuid;

use kataforge_auth_types::token::VerificationPurpose;
use kataforge_domain::user::UserRole;

use crate::domain::repository::{UserRepository, VerificationCodeRepository};
use crate::domain::types::AuthUser;
use crate::email::Mailer;
use crate::error::AuthServiceError;
use crate::password::hash_password;
use crate::usecase::AuthOutcome;
use crate::usecase::code::begin_verification;
use crate::usecase::token::issue_session_token;

pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct SignupUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub users: U,
    pub codes: C,
    pub mailer: Mailer,
    pub jwt_secret: String,
    pub two_factor: bool,
}

impl<U, C> SignupUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub async fn execute(&self, input: SignupInput) -> Result<AuthOutcome, AuthServiceError> {
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AuthServiceError::EmailTaken);
        }

        let password_hash = hash_password(&input.password)?;
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: input.email,
            password_hash,
            name: Some(input.name),
            role: UserRole::Student.as_str().to_owned(),
            is_active: true,
        };
        self.users.create(&user).await?;

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
