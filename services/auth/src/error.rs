use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service error variants.
///
/// Messages are the exact client-facing text; nothing from an underlying
/// cause ever reaches a response body. `InvalidCredentials` deliberately does
/// not say whether the email or the password was wrong, and `SessionExpired`
/// covers missing, invalid, and expired verification artifacts alike.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Invalid request data")]
    InvalidInput(#[from] validator::ValidationErrors),
    #[error("Security verification failed")]
    SecurityCheckFailed,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Account disabled. Contact support.")]
    AccountDisabled,
    #[error("This email is already registered")]
    EmailTaken,
    #[error("Verification session expired or invalid")]
    SessionExpired,
    #[error("Invalid or expired code")]
    InvalidCode,
    #[error("User not found or deactivated")]
    UserNotFound,
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::SecurityCheckFailed => "SECURITY_CHECK_FAILED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::InvalidCode => "INVALID_CODE",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidInput(_) | Self::SecurityCheckFailed | Self::InvalidCode => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::SessionExpired => StatusCode::UNAUTHORIZED,
            Self::AccountDisabled => StatusCode::FORBIDDEN,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = match &self {
            Self::InvalidInput(errors) => serde_json::json!({
                "error": self.to_string(),
                "details": errors,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}
