use sea_orm::DatabaseConnection;

use crate::challenge::ChallengeGate;
use crate::config::AuthConfig;
use crate::email::Mailer;
use crate::infra::db::{DbUserRepository, DbVerificationCodeRepository};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    /// Secure cookie attribute — set in production only.
    pub secure_cookies: bool,
    /// Whether login/signup require the emailed second factor.
    pub two_factor: bool,
    pub mailer: Mailer,
    pub challenge: ChallengeGate,
}

impl AppState {
    pub fn new(config: &AuthConfig, db: DatabaseConnection) -> Self {
        Self {
            db,
            jwt_secret: config.jwt_secret.clone(),
            secure_cookies: config.production,
            two_factor: config.two_factor_enabled(),
            mailer: Mailer::from_config(config),
            challenge: ChallengeGate::new(config.turnstile_secret.clone(), config.production),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn verification_code_repo(&self) -> DbVerificationCodeRepository {
        DbVerificationCodeRepository {
            db: self.db.clone(),
        }
    }
}
