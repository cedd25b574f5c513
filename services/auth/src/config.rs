/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing session and verification tokens.
    pub jwt_secret: String,
    /// TCP port to listen on (default 3112). Env var: `AUTH_PORT`.
    pub auth_port: u16,
    /// Production mode (`APP_ENV=production`). Gates two-factor enforcement,
    /// the challenge gate, and the Secure cookie attribute.
    pub production: bool,
    /// Challenge-gate server secret. Env var: `TURNSTILE_SECRET`.
    pub turnstile_secret: String,
    /// Email API endpoint. Env var: `EMAIL_API_URL`.
    pub email_api_url: String,
    /// Email API key; empty means log-only delivery. Env var: `EMAIL_API_KEY`.
    pub email_api_key: String,
    /// From-address for verification emails. Env var: `EMAIL_FROM`.
    pub email_from: String,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            auth_port: std::env::var("AUTH_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3112),
            production: std::env::var("APP_ENV").is_ok_and(|v| v == "production"),
            turnstile_secret: std::env::var("TURNSTILE_SECRET").unwrap_or_default(),
            email_api_url: std::env::var("EMAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".to_owned()),
            email_api_key: std::env::var("EMAIL_API_KEY").unwrap_or_default(),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "noreply@kataforge.dev".to_owned()),
        }
    }

    /// Two-factor login is a production policy; dev logins mint a session
    /// directly so local work does not depend on email delivery.
    pub fn two_factor_enabled(&self) -> bool {
        self.production
    }
}
