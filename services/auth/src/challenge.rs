//! Human-verification challenge gate (Turnstile-style).

use serde::Deserialize;

/// Default verify endpoint (Cloudflare Turnstile).
const SITEVERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

#[derive(Deserialize)]
struct SiteVerifyResponse {
    success: bool,
}

/// Verifies challenge response tokens against the provider.
///
/// Disabled outside production so local flows never depend on the provider.
/// When enabled, any transport or decode failure counts as a failed check;
/// callers surface only the generic security-check error.
#[derive(Clone)]
pub struct ChallengeGate {
    client: reqwest::Client,
    verify_url: String,
    secret: String,
    enabled: bool,
}

impl ChallengeGate {
    pub fn new(secret: String, enabled: bool) -> Self {
        Self {
            client: reqwest::Client::new(),
            verify_url: SITEVERIFY_URL.to_owned(),
            secret,
            enabled,
        }
    }

    /// A gate that accepts everything (dev mode).
    pub fn disabled() -> Self {
        Self::new(String::new(), false)
    }

    /// Check a client-supplied challenge response token.
    pub async fn verify(&self, response_token: &str) -> bool {
        if !self.enabled {
            return true;
        }

        let form = [
            ("secret", self.secret.as_str()),
            ("response", response_token),
        ];
        let response = match self.client.post(&self.verify_url).form(&form).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "challenge verification request failed");
                return false;
            }
        };
        match response.json::<SiteVerifyResponse>().await {
            Ok(body) => body.success,
            Err(e) => {
                tracing::warn!(error = %e, "challenge verification returned unreadable body");
                false
            }
        }
    }
}
