//! Extractor for the identity established by the access middleware.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;

use crate::token::SessionClaims;

/// Session identity forwarded by the access middleware via request
/// extensions after it validated the `session_token` cookie.
///
/// Returns 401 if no validated session is attached to the request — i.e.
/// the handler was reached without passing through the middleware.
/// Role enforcement (403) is done by handlers after extraction.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionClaims);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // `async fn` captures lifetimes differently under precise capturing,
    // causing E0195. Extract synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let claims = parts.extensions.get::<SessionClaims>().cloned();

        async move {
            let claims = claims.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self(claims))
        }
    }
}
