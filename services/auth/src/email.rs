//! Verification-code email delivery.

use anyhow::{Context as _, anyhow};
use serde_json::json;

use kataforge_auth_types::token::VerificationPurpose;

use crate::config::AuthConfig;
use crate::error::AuthServiceError;

/// Email delivery backend.
///
/// `Http` posts to a Resend-style JSON API; `Log` writes the message to the
/// log instead, for local development where no API key is configured. Either
/// way the flow code is identical.
#[derive(Clone)]
pub enum Mailer {
    Http(HttpMailer),
    Log,
}

#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl Mailer {
    pub fn from_config(config: &AuthConfig) -> Self {
        if config.email_api_key.is_empty() {
            Self::Log
        } else {
            Self::Http(HttpMailer {
                client: reqwest::Client::new(),
                api_url: config.email_api_url.clone(),
                api_key: config.email_api_key.clone(),
                from: config.email_from.clone(),
            })
        }
    }

    pub async fn send(&self, to: &str, subject: &str, text: &str) -> anyhow::Result<()> {
        match self {
            Self::Log => {
                tracing::info!(to = %to, subject = %subject, body = %text, "email delivery (log mode)");
                Ok(())
            }
            Self::Http(mailer) => {
                let response = mailer
                    .client
                    .post(&mailer.api_url)
                    .bearer_auth(&mailer.api_key)
                    .json(&json!({
                        "from": mailer.from,
                        "to": [to],
                        "subject": subject,
                        "text": text,
                    }))
                    .send()
                    .await
                    .context("send email request")?;
                if !response.status().is_success() {
                    return Err(anyhow!("email provider returned {}", response.status()));
                }
                Ok(())
            }
        }
    }
}

/// Send the 6-digit code for a pending two-factor login or password reset.
pub async fn send_verification_email(
    mailer: &Mailer,
    to: &str,
    code: &str,
    purpose: VerificationPurpose,
) -> Result<(), AuthServiceError> {
    let (subject, text) = match purpose {
        VerificationPurpose::TwoFactor => (
            "Your verification code",
            format!("Your verification code is: {code}. This code expires in 5 minutes."),
        ),
        VerificationPurpose::PasswordReset => (
            "Password reset",
            format!("Your password reset code is: {code}. This code expires in 5 minutes."),
        ),
    };
    mailer
        .send(to, subject, &text)
        .await
        .map_err(AuthServiceError::Internal)
}
