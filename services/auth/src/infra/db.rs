use anyhow::{Context as _, anyhow};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use kataforge_auth_schema::{users, verification_codes};
use kataforge_auth_types::token::VerificationPurpose;

use crate::domain::repository::{UserRepository, VerificationCodeRepository};
use crate::domain::types::{AuthUser, VerificationCode};
use crate::error::AuthServiceError;

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &AuthUser) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            name: Set(user.name.clone()),
            role: Set(user.role.clone()),
            is_active: Set(user.is_active),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(id),
            password_hash: Set(password_hash.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update password hash")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> AuthUser {
    AuthUser {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        name: model.name,
        role: model.role,
        is_active: model.is_active,
    }
}

// ── Verification-code repository ──────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVerificationCodeRepository {
    pub db: DatabaseConnection,
}

impl VerificationCodeRepository for DbVerificationCodeRepository {
    async fn replace_active(&self, code: &VerificationCode) -> Result<(), AuthServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let code = code.clone();
                Box::pin(async move {
                    delete_codes_for(txn, code.user_id, code.purpose).await?;
                    insert_code(txn, &code).await?;
                    Ok(())
                })
            })
            .await
            .context("replace active verification code")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, AuthServiceError> {
        let model = verification_codes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find verification code by id")?;
        model.map(code_from_model).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<(), AuthServiceError> {
        verification_codes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete verification code")?;
        Ok(())
    }
}

async fn delete_codes_for(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    purpose: VerificationPurpose,
) -> Result<(), sea_orm::DbErr> {
    verification_codes::Entity::delete_many()
        .filter(verification_codes::Column::UserId.eq(user_id))
        .filter(verification_codes::Column::Purpose.eq(purpose.as_str()))
        .exec(txn)
        .await?;
    Ok(())
}

async fn insert_code(
    txn: &DatabaseTransaction,
    code: &VerificationCode,
) -> Result<(), sea_orm::DbErr> {
    verification_codes::ActiveModel {
        id: Set(code.id),
        user_id: Set(code.user_id),
        code: Set(code.code.clone()),
        purpose: Set(code.purpose.as_str().to_owned()),
        expires_at: Set(code.expires_at),
        created_at: Set(code.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn code_from_model(model: verification_codes::Model) -> Result<VerificationCode, AuthServiceError> {
    let purpose = VerificationPurpose::from_str(&model.purpose).ok_or_else(|| {
        anyhow!(
            "unknown verification purpose {:?} in row {}",
            model.purpose,
            model.id
        )
    })?;
    Ok(VerificationCode {
        id: model.id,
        user_id: model.user_id,
        code: model.code,
        purpose,
        expires_at: model.expires_at,
        created_at: model.created_at,
    })
}
