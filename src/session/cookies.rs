use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{time::Duration, Cookie, SameSite};
use uuid::Uuid;

use crate::config::SessionConfig;

/// Builds the `Set-Cookie` value that carries the session token.
pub fn session_cookie(cfg: &SessionConfig, token: Uuid) -> anyhow::Result<HeaderValue> {
    let cookie = Cookie::build((cfg.cookie_name.clone(), token.to_string()))
        .path("/")
        .max_age(Duration::days(cfg.max_age_days))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cfg.secure)
        .build();
    Ok(HeaderValue::from_str(&cookie.to_string())?)
}

/// Finds the session token among the request's `Cookie` headers.
///
/// Returns `None` when the cookie is absent or does not hold a UUID.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == cookie_name)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
}
