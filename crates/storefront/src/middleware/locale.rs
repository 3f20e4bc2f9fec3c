//! Locale middleware and extractor.
//!
//! Every request is resolved to one locale before it reaches a handler. When
//! the choice differs from the `locale` cookie, the response rewrites it.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        HeaderMap, HeaderValue,
        header::{ACCEPT_LANGUAGE, COOKIE, SET_COOKIE},
        request::Parts,
    },
    middleware::Next,
    response::Response,
};
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};
use tracing::{Span, debug};
use vitrine_core::Locale;
use vitrine_core::locale::{
    LOCALE_COOKIE, LOCALE_COOKIE_MAX_AGE_SECONDS, LOCALE_QUERY_PARAM, resolve_locale,
};

use crate::state::AppState;

/// Locale chosen for the current request, stored in request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

/// Resolve the request locale from `?lang=`, the cookie, then
/// `Accept-Language`, and persist it when it changed.
pub async fn locale_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let query = request
        .uri()
        .query()
        .and_then(|q| query_param(q, LOCALE_QUERY_PARAM));
    let cookie = cookie_value(request.headers(), LOCALE_COOKIE);
    let accept_language = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());

    let resolution = resolve_locale(
        query.as_deref(),
        cookie.as_deref(),
        accept_language,
        &Locale::ALL,
        state.config().default_locale,
    );

    Span::current().record("locale", resolution.locale.code());
    request
        .extensions_mut()
        .insert(RequestLocale(resolution.locale));

    let mut response = next.run(request).await;

    if resolution.persist {
        debug!(locale = resolution.locale.code(), "Persisting locale cookie");
        if let Ok(value) = HeaderValue::from_str(&locale_cookie(resolution.locale).to_string()) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    response
}

/// The `locale` cookie for `locale`: site-wide, one year, `SameSite=Lax`.
#[must_use]
pub fn locale_cookie(locale: Locale) -> Cookie<'static> {
    Cookie::build((LOCALE_COOKIE, locale.code()))
        .path("/")
        .max_age(Duration::seconds(LOCALE_COOKIE_MAX_AGE_SECONDS))
        .same_site(SameSite::Lax)
        .build()
}

fn query_param(query: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// Extractor for the request locale.
///
/// Falls back to the default locale when the middleware did not run.
#[derive(Debug, Clone, Copy)]
pub struct Lang(pub Locale);

impl<S> FromRequestParts<S> for Lang
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .extensions
            .get::<RequestLocale>()
            .map_or_else(Locale::default, |RequestLocale(locale)| *locale);
        Ok(Self(locale))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_decodes() {
        assert_eq!(query_param("page=2&lang=uz", "lang").as_deref(), Some("uz"));
        assert_eq!(query_param("q=feed+pump", "q").as_deref(), Some("feed pump"));
        assert_eq!(query_param("page=2", "lang"), None);
    }

    #[test]
    fn test_cookie_value_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("a=1; locale=en"));
        assert_eq!(cookie_value(&headers, "locale").as_deref(), Some("en"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_locale_cookie_attributes() {
        let cookie = locale_cookie(Locale::Uz).to_string();
        assert!(cookie.starts_with("locale=uz"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=31536000"));
        assert!(cookie.contains("SameSite=Lax"));
    }
}
