//! Auth flow handlers: payload validation, challenge gate, cookies, JSON.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use kataforge_auth_types::cookie::{
    VERIFICATION_ID, VERIFICATION_TOKEN, clear_session_cookie, clear_verification_cookies,
    set_session_cookie, set_verification_cookies,
};
use kataforge_auth_types::token::{
    VerificationClaims, VerificationPurpose, validate_verification_token,
};

use crate::domain::types::AuthUser;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::AuthOutcome;
use crate::usecase::login::{LoginInput, LoginUseCase};
use crate::usecase::reset::{CompleteResetInput, CompleteResetUseCase, RequestResetUseCase};
use crate::usecase::signup::{SignupInput, SignupUseCase};
use crate::usecase::verify::{VerifyCodeInput, VerifyCodeUseCase};

/// The one message `send-code` ever returns, account or not.
const RESET_REQUESTED: &str = "If the email exists, a reset code has been sent";

fn profile(user: &AuthUser) -> serde_json::Value {
    json!({
        "id": user.id,
        "email": user.email,
        "name": user.name,
        "role": user.role,
    })
}

async fn ensure_challenge(
    state: &AppState,
    token: Option<&str>,
) -> Result<(), AuthServiceError> {
    // Missing token counts as a failed check when the gate is enabled.
    if !state.challenge.verify(token.unwrap_or_default()).await {
        return Err(AuthServiceError::SecurityCheckFailed);
    }
    Ok(())
}

/// Read the verification cookie pair. `None` when either half is missing or
/// the id is not a UUID — the attempt cannot be located then.
fn read_verification_cookies(jar: &CookieJar) -> Option<(String, Uuid)> {
    let token = jar.get(VERIFICATION_TOKEN)?.value().to_owned();
    let code_id = jar.get(VERIFICATION_ID)?.value().parse::<Uuid>().ok()?;
    Some((token, code_id))
}

/// Validate the verification token from the cookie pair; failure clears both
/// cookies — the attempt is unrecoverable and the client must restart.
fn validated_verification_claims(
    jar: CookieJar,
    secure: bool,
    jwt_secret: &str,
) -> Result<(CookieJar, VerificationClaims, Uuid), Response> {
    let Some((token, code_id)) = read_verification_cookies(&jar) else {
        return Err(AuthServiceError::SessionExpired.into_response());
    };
    match validate_verification_token(&token, jwt_secret) {
        Ok(claims) => Ok((jar, claims, code_id)),
        Err(_) => {
            let jar = clear_verification_cookies(jar, secure);
            Err((jar, AuthServiceError::SessionExpired).into_response())
        }
    }
}

// ── POST /api/v1/auth/login ───────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default, rename = "turnstileToken")]
    pub turnstile_token: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AuthServiceError> {
    body.validate()?;
    ensure_challenge(&state, body.turnstile_token.as_deref()).await?;

    let usecase = LoginUseCase {
        users: state.user_repo(),
        codes: state.verification_code_repo(),
        mailer: state.mailer.clone(),
        jwt_secret: state.jwt_secret.clone(),
        two_factor: state.two_factor,
    };
    let outcome = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(auth_outcome_response(
        outcome,
        jar,
        state.secure_cookies,
        StatusCode::OK,
        "Login successful",
    ))
}

// ── POST /api/v1/auth/signup ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
    #[serde(default, rename = "turnstileToken")]
    pub turnstile_token: Option<String>,
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignupRequest>,
) -> Result<Response, AuthServiceError> {
    body.validate()?;
    ensure_challenge(&state, body.turnstile_token.as_deref()).await?;

    let usecase = SignupUseCase {
        users: state.user_repo(),
        codes: state.verification_code_repo(),
        mailer: state.mailer.clone(),
        jwt_secret: state.jwt_secret.clone(),
        two_factor: state.two_factor,
    };
    let outcome = usecase
        .execute(SignupInput {
            name: body.name,
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(auth_outcome_response(
        outcome,
        jar,
        state.secure_cookies,
        StatusCode::CREATED,
        "Account created",
    ))
}

/// Shared tail of login and signup: a session cookie + profile, or the
/// verification cookie pair + `requireVerification`.
fn auth_outcome_response(
    outcome: AuthOutcome,
    jar: CookieJar,
    secure: bool,
    status: StatusCode,
    message: &str,
) -> Response {
    match outcome {
        AuthOutcome::Session {
            user,
            session_token,
        } => {
            let jar = set_session_cookie(jar, session_token, secure);
            (
                status,
                jar,
                Json(json!({ "message": message, "user": profile(&user) })),
            )
                .into_response()
        }
        AuthOutcome::VerificationRequired {
            verification_token,
            code_id,
        } => {
            let jar =
                set_verification_cookies(jar, verification_token, code_id.to_string(), secure);
            (
                status,
                jar,
                Json(json!({
                    "message": "Verification code sent",
                    "requireVerification": true,
                })),
            )
                .into_response()
        }
    }
}

// ── POST /api/v1/auth/verify ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct VerifyRequest {
    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    pub code: String,
}

pub async fn verify(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<VerifyRequest>,
) -> Result<Response, AuthServiceError> {
    body.validate()?;

    let (jar, claims, code_id) =
        match validated_verification_claims(jar, state.secure_cookies, &state.jwt_secret) {
            Ok(ok) => ok,
            Err(response) => return Ok(response),
        };

    let usecase = VerifyCodeUseCase {
        users: state.user_repo(),
        codes: state.verification_code_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    match usecase
        .execute(VerifyCodeInput {
            claims,
            code_id,
            code: body.code,
        })
        .await
    {
        Ok(output) => {
            let jar = clear_verification_cookies(jar, state.secure_cookies);
            let jar = set_session_cookie(jar, output.session_token, state.secure_cookies);
            Ok((
                StatusCode::OK,
                jar,
                Json(json!({
                    "message": "Verification successful",
                    "user": profile(&output.user),
                })),
            )
                .into_response())
        }
        // The pending attempt is void; a kept cookie pair could never succeed.
        Err(err @ AuthServiceError::UserNotFound) => {
            let jar = clear_verification_cookies(jar, state.secure_cookies);
            Ok((jar, err).into_response())
        }
        // InvalidCode keeps the cookies: the user may retype until expiry.
        Err(err) => Err(err),
    }
}

// ── POST /api/v1/auth/send-code ───────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct SendCodeRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[serde(default, rename = "turnstileToken")]
    pub turnstile_token: Option<String>,
}

pub async fn send_code(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SendCodeRequest>,
) -> Result<Response, AuthServiceError> {
    body.validate()?;
    ensure_challenge(&state, body.turnstile_token.as_deref()).await?;

    let usecase = RequestResetUseCase {
        users: state.user_repo(),
        codes: state.verification_code_repo(),
        mailer: state.mailer.clone(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let response_body = Json(json!({ "message": RESET_REQUESTED }));
    match usecase.execute(&body.email).await? {
        Some((verification_token, code_id)) => {
            let jar = set_verification_cookies(
                jar,
                verification_token,
                code_id.to_string(),
                state.secure_cookies,
            );
            Ok((StatusCode::OK, jar, response_body).into_response())
        }
        // Unknown account: identical status and body, no cookies.
        None => Ok((StatusCode::OK, response_body).into_response()),
    }
}

// ── POST /api/v1/auth/reset-password ──────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    pub code: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Response, AuthServiceError> {
    body.validate()?;

    let (jar, claims, code_id) =
        match validated_verification_claims(jar, state.secure_cookies, &state.jwt_secret) {
            Ok(ok) => ok,
            Err(response) => return Ok(response),
        };

    // A two-factor token must not complete a password reset.
    if claims.purpose != VerificationPurpose::PasswordReset {
        let jar = clear_verification_cookies(jar, state.secure_cookies);
        return Ok((jar, AuthServiceError::SessionExpired).into_response());
    }

    let usecase = CompleteResetUseCase {
        users: state.user_repo(),
        codes: state.verification_code_repo(),
    };
    match usecase
        .execute(CompleteResetInput {
            claims,
            code_id,
            code: body.code,
            new_password: body.password,
        })
        .await
    {
        Ok(()) => {
            let jar = clear_verification_cookies(jar, state.secure_cookies);
            Ok((
                StatusCode::OK,
                jar,
                Json(json!({ "message": "Password reset successful" })),
            )
                .into_response())
        }
        Err(err @ AuthServiceError::UserNotFound) => {
            let jar = clear_verification_cookies(jar, state.secure_cookies);
            Ok((jar, err).into_response())
        }
        Err(err) => Err(err),
    }
}

// ── POST /api/v1/auth/logout ──────────────────────────────────────────────────

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    // Idempotent: clearing an absent cookie is still a successful logout.
    let jar = clear_session_cookie(jar, state.secure_cookies);
    (
        StatusCode::OK,
        jar,
        Json(json!({ "message": "Logout successful" })),
    )
        .into_response()
}
