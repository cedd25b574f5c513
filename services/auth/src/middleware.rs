//! Access middleware: gates every non-public request on a valid session.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use kataforge_auth_types::cookie::SESSION_TOKEN;
use kataforge_auth_types::token::validate_session_token;
use kataforge_domain::user::UserRole;

use crate::state::AppState;

/// Routes exempt from session enforcement. Prefix match, except the root
/// path which must match exactly (otherwise it would allow everything).
pub const PUBLIC_PATHS: &[&str] = &["/", "/auth", "/api/v1/auth", "/healthz", "/readyz"];

fn is_public(path: &str) -> bool {
    PUBLIC_PATHS
        .iter()
        .any(|p| if *p == "/" { path == "/" } else { path.starts_with(p) })
}

/// Unauthenticated handling: API callers get machine-readable 401 JSON,
/// browser navigations get bounced to the login page with a `redirect`
/// parameter so the client can return after signing in.
fn unauthenticated(path: &str, message: &str) -> Response {
    if path.starts_with("/api/") {
        (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({
                "success": false,
                "message": format!("Unauthorized: {message}"),
            })),
        )
            .into_response()
    } else {
        let target = format!("/auth/login?redirect={}", urlencoding::encode(path));
        Redirect::temporary(&target).into_response()
    }
}

/// Session gate applied over the whole router.
///
/// On success the validated claims are inserted into request extensions for
/// downstream handlers (`CurrentUser` extractor) and role checks.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if is_public(&path) {
        return next.run(request).await;
    }

    let Some(cookie) = jar.get(SESSION_TOKEN) else {
        return unauthenticated(&path, "authentication required");
    };

    match validate_session_token(cookie.value(), &state.jwt_secret) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(_) => unauthenticated(&path, "session invalid or expired"),
    }
}

/// Convenience role gate: validate the session cookie and test membership.
/// Any failure — missing cookie, bad token, unknown role — yields false.
pub fn check_role(jar: &CookieJar, jwt_secret: &str, allowed: &[UserRole]) -> bool {
    let Some(cookie) = jar.get(SESSION_TOKEN) else {
        return false;
    };
    let Ok(claims) = validate_session_token(cookie.value(), jwt_secret) else {
        return false;
    };
    UserRole::from_str(&claims.role).is_some_and(|role| allowed.contains(&role))
}
