use axum::http::HeaderName;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::request_id::{MakeRequestId, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::handlers::{
    auth::{login, logout, reset_password, send_code, signup, verify},
    health::{healthz, readyz},
    user::current_user,
};
use crate::middleware::require_session;
use crate::state::AppState;

/// Stamps each request with a fresh UUID in `x-request-id`, so one request's
/// log lines can be correlated across the trace span.
#[derive(Clone, Default)]
struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        Uuid::new_v4().to_string().parse().ok().map(RequestId::new)
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth flows
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/signup", post(signup))
        .route("/api/v1/auth/verify", post(verify))
        .route("/api/v1/auth/send-code", post(send_code))
        .route("/api/v1/auth/reset-password", post(reset_password))
        .route("/api/v1/auth/logout", post(logout))
        // Session-gated
        .route("/api/v1/user", get(current_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            MakeUuidRequestId,
        ))
        .with_state(state)
}
