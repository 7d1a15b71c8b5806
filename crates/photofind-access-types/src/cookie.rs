//! Cookie builders for the access-code session.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name carrying the signed session token.
pub const ACCESS_CODE: &str = "access_code";

/// Session cookie lifetime in seconds (365 days).
///
/// Independent of the access code's own TTL: redemption is a one-time gate,
/// the session it yields is long-lived.
pub const COOKIE_LIFE_SECS: i64 = 365 * 24 * 60 * 60;

/// Set the session cookie on the jar.
///
/// `secure` is off only for local development over plain HTTP.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use photofind_access_types::cookie::{set_access_code_cookie, ACCESS_CODE};
///
/// let jar = CookieJar::new();
/// let jar = set_access_code_cookie(jar, "signed_value".to_string(), true);
/// let cookie = jar.get(ACCESS_CODE).unwrap();
/// assert_eq!(cookie.value(), "signed_value");
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::days(365)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_access_code_cookie(jar: CookieJar, value: String, secure: bool) -> CookieJar {
    let cookie = Cookie::build((ACCESS_CODE, value))
        .path("/")
        .max_age(Duration::seconds(COOKIE_LIFE_SECS))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Read the raw session cookie value, if present and non-empty.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use photofind_access_types::cookie::{access_code_cookie, set_access_code_cookie};
///
/// assert_eq!(access_code_cookie(&CookieJar::new()), None);
/// let jar = set_access_code_cookie(CookieJar::new(), "v".to_string(), false);
/// assert_eq!(access_code_cookie(&jar).as_deref(), Some("v"));
/// ```
pub fn access_code_cookie(jar: &CookieJar) -> Option<String> {
    jar.get(ACCESS_CODE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}
