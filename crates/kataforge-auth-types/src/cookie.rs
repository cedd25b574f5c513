//! Cookie builders for the session token and the verification pair.
//!
//! The verification token and its code-id cookie are always written and
//! cleared together: a verification attempt needs the signed claims and the
//! code row they were minted with. Clearing rewrites the exact attributes of
//! the set call with Max-Age=0 — mismatched attributes make some browsers
//! retain the cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::token::{SESSION_EXPIRATION, VERIFICATION_EXPIRATION};

/// Cookie name for the session token.
pub const SESSION_TOKEN: &str = "session_token";

/// Cookie name for the verification token.
pub const VERIFICATION_TOKEN: &str = "verification_token";

/// Cookie name for the verification-code row id.
pub const VERIFICATION_ID: &str = "verification_id";

fn secure_cookie(
    name: &'static str,
    value: String,
    max_age_secs: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Set the session-token cookie on the jar.
///
/// `secure` should be true in production only; local HTTP would otherwise
/// drop the cookie.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use kataforge_auth_types::cookie::{set_session_cookie, SESSION_TOKEN};
///
/// let jar = set_session_cookie(CookieJar::new(), "token_value".to_string(), true);
/// let cookie = jar.get(SESSION_TOKEN).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604_800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, secure: bool) -> CookieJar {
    jar.add(secure_cookie(
        SESSION_TOKEN,
        value,
        SESSION_EXPIRATION as i64,
        secure,
    ))
}

/// Clear the session-token cookie (logout).
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use kataforge_auth_types::cookie::{clear_session_cookie, set_session_cookie, SESSION_TOKEN};
///
/// let jar = set_session_cookie(CookieJar::new(), "t".to_string(), false);
/// let jar = clear_session_cookie(jar, false);
/// assert_eq!(jar.get(SESSION_TOKEN).unwrap().max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(secure_cookie(SESSION_TOKEN, String::new(), 0, secure))
}

/// Set the verification-token and code-id cookies together.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use kataforge_auth_types::cookie::{
///     set_verification_cookies, VERIFICATION_ID, VERIFICATION_TOKEN,
/// };
///
/// let jar = set_verification_cookies(
///     CookieJar::new(),
///     "signed-token".to_string(),
///     "code-row-id".to_string(),
///     false,
/// );
/// let token = jar.get(VERIFICATION_TOKEN).unwrap();
/// let id = jar.get(VERIFICATION_ID).unwrap();
/// assert_eq!(token.max_age(), Some(time::Duration::seconds(300)));
/// assert_eq!(id.max_age(), Some(time::Duration::seconds(300)));
/// assert_eq!(id.value(), "code-row-id");
/// ```
pub fn set_verification_cookies(
    jar: CookieJar,
    token: String,
    code_id: String,
    secure: bool,
) -> CookieJar {
    let ttl = VERIFICATION_EXPIRATION as i64;
    jar.add(secure_cookie(VERIFICATION_TOKEN, token, ttl, secure))
        .add(secure_cookie(VERIFICATION_ID, code_id, ttl, secure))
}

/// Clear both verification cookies.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use kataforge_auth_types::cookie::{
///     clear_verification_cookies, set_verification_cookies,
///     VERIFICATION_ID, VERIFICATION_TOKEN,
/// };
///
/// let jar = set_verification_cookies(CookieJar::new(), "t".to_string(), "i".to_string(), false);
/// let jar = clear_verification_cookies(jar, false);
/// assert_eq!(jar.get(VERIFICATION_TOKEN).unwrap().max_age(), Some(time::Duration::ZERO));
/// assert_eq!(jar.get(VERIFICATION_ID).unwrap().max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_verification_cookies(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(secure_cookie(VERIFICATION_TOKEN, String::new(), 0, secure))
        .add(secure_cookie(VERIFICATION_ID, String::new(), 0, secure))
}
