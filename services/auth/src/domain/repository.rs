#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{AuthUser, VerificationCode};
use crate::error::AuthServiceError;

/// Repository for account records.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthServiceError>;

    /// Insert a new account. The unique index on `email` backs the
    /// uniqueness check done by the signup flow.
    async fn create(&self, user: &AuthUser) -> Result<(), AuthServiceError>;

    /// Overwrite the stored password hash (password reset).
    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), AuthServiceError>;
}

/// Repository for single-use verification codes.
pub trait VerificationCodeRepository: Send + Sync {
    /// Delete any existing codes for `(code.user_id, code.purpose)` and
    /// insert `code`, in a single transaction — the at-most-one-active-code
    /// invariant depends on the delete and insert landing together.
    async fn replace_active(&self, code: &VerificationCode) -> Result<(), AuthServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, AuthServiceError>;

    /// Delete a code row (consumed or discovered expired).
    async fn delete(&self, id: Uuid) -> Result<(), AuthServiceError>;
}
