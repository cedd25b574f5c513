use axum::Json;
use serde_json::json;

use kataforge_auth_types::identity::CurrentUser;

/// Handler for `GET /api/v1/user` — the profile behind the session cookie.
///
/// The access middleware has already validated the `session_token` cookie
/// and attached its claims; an unauthenticated request never reaches here.
pub async fn current_user(CurrentUser(claims): CurrentUser) -> Json<serde_json::Value> {
    Json(json!({
        "user": {
            "name": claims.name,
            "role": claims.role,
        }
    }))
}
