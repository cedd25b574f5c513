//! HTTP-level tests for the access middleware and the session-gated routes.
//!
//! Uses a disconnected database handle: the routes exercised here never
//! touch storage, so no live Postgres is needed.

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::Value;

use kataforge_auth::challenge::ChallengeGate;
use kataforge_auth::email::Mailer;
use kataforge_auth::router::build_router;
use kataforge_auth::state::AppState;
use kataforge_testing::auth::{SessionFixture, expired_session_token};

use crate::helpers::TEST_JWT_SECRET;

fn test_server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::default(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        secure_cookies: false,
        two_factor: false,
        mailer: Mailer::Log,
        challenge: ChallengeGate::disabled(),
    };
    TestServer::new(build_router(state)).unwrap()
}

fn session_cookie(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("session_token={token}")).unwrap()
}

#[tokio::test]
async fn public_paths_pass_without_a_session() {
    let server = test_server();
    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    // Public (no 401/redirect), but not ready: the test DB is disconnected.
    assert_eq!(
        server.get("/readyz").await.status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn api_request_without_session_gets_401_json() {
    let server = test_server();
    let response = server.get("/api/v1/user").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let json: Value = response.json();
    assert_eq!(json["success"], false);
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("authentication required")
    );
}

#[tokio::test]
async fn api_request_with_valid_session_passes() {
    let server = test_server();
    let fixture = SessionFixture::new("professor");
    let (name, value) = fixture.cookie_header(TEST_JWT_SECRET);

    let response = server.get("/api/v1/user").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["user"]["name"], "Jane");
    assert_eq!(json["user"]["role"], "professor");
}

#[tokio::test]
async fn api_request_with_garbage_token_gets_401_json() {
    let server = test_server();
    let response = server
        .get("/api/v1/user")
        .add_header(header::COOKIE, session_cookie("not-a-jwt"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let json: Value = response.json();
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("session invalid or expired")
    );
}

#[tokio::test]
async fn api_request_with_expired_token_gets_401_json() {
    let server = test_server();
    let token = expired_session_token(TEST_JWT_SECRET);
    let response = server
        .get("/api/v1/user")
        .add_header(header::COOKIE, session_cookie(&token))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn web_request_without_session_redirects_to_login() {
    let server = test_server();
    let response = server.get("/problems/42").await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header("location"),
        "/auth/login?redirect=%2Fproblems%2F42"
    );
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let server = test_server();
    let fixture = SessionFixture::new("student");
    let (name, value) = fixture.cookie_header(TEST_JWT_SECRET);

    let response = server
        .post("/api/v1/auth/logout")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["message"], "Logout successful");

    let set_cookie = response.header(header::SET_COOKIE);
    let set_cookie = set_cookie.to_str().unwrap();
    assert!(set_cookie.starts_with("session_token="));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn logout_without_a_session_still_succeeds() {
    let server = test_server();
    let response = server.post("/api/v1/auth/logout").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}
