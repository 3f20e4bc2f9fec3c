//! Locale resolution for incoming requests.
//!
//! A visitor's language comes from, in order of preference: an explicit
//! `?lang=` query parameter, the `locale` cookie, the browser's
//! `Accept-Language` header, and finally the site default. Whatever wins is
//! written back to the cookie so the choice sticks across pages.

use crate::types::Locale;

/// Name of the cookie that remembers the visitor's locale.
pub const LOCALE_COOKIE: &str = "locale";

/// Query parameter that switches the locale explicitly.
pub const LOCALE_QUERY_PARAM: &str = "lang";

/// Lifetime of the locale cookie in seconds (one year).
pub const LOCALE_COOKIE_MAX_AGE_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Outcome of [`resolve_locale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleResolution {
    /// Locale to render the response in.
    pub locale: Locale,
    /// True when the cookie is absent or holds a different value, so the
    /// caller must write `locale` back to it.
    pub persist: bool,
}

/// Pick the locale for a request. First match wins:
///
/// 1. `query` if it names a member of `supported`;
/// 2. `cookie` if it names a member of `supported`;
/// 3. the primary tag of `accept_language` (text before the first `,`,
///    then before the first `-`) if it names a member of `supported`;
/// 4. `default`.
///
/// Never fails. Codes are compared exactly, so `EN` or `en;q=0.9` do not match.
#[must_use]
pub fn resolve_locale(
    query: Option<&str>,
    cookie: Option<&str>,
    accept_language: Option<&str>,
    supported: &[Locale],
    default: Locale,
) -> LocaleResolution {
    let pick = |candidate: Option<&str>| {
        candidate
            .and_then(|code| code.parse::<Locale>().ok())
            .filter(|locale| supported.contains(locale))
    };

    let locale = pick(query)
        .or_else(|| pick(cookie))
        .or_else(|| pick(accept_language.map(primary_language_tag)))
        .unwrap_or(default);

    LocaleResolution {
        locale,
        persist: cookie != Some(locale.code()),
    }
}

/// Primary language subtag of the first entry in an `Accept-Language` value.
fn primary_language_tag(header: &str) -> &str {
    let first = header.split(',').next().unwrap_or(header);
    first.split('-').next().unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[Locale] = &Locale::ALL;

    #[test]
    fn test_query_param_wins() {
        let res = resolve_locale(Some("en"), Some("uz"), Some("ru-RU"), ALL, Locale::Ru);
        assert_eq!(res.locale, Locale::En);
        assert!(res.persist);
    }

    #[test]
    fn test_cookie_used_when_query_invalid() {
        let res = resolve_locale(Some("fr"), Some("uz"), Some("en"), ALL, Locale::Ru);
        assert_eq!(res.locale, Locale::Uz);
        assert!(!res.persist);
    }

    #[test]
    fn test_accept_language_primary_tag() {
        let res = resolve_locale(None, None, Some("en-US,en;q=0.9,ru;q=0.8"), ALL, Locale::Ru);
        assert_eq!(res.locale, Locale::En);
        assert!(res.persist);
    }

    #[test]
    fn test_accept_language_with_quality_on_first_entry_does_not_match() {
        let res = resolve_locale(None, None, Some("uz;q=0.9"), ALL, Locale::Ru);
        assert_eq!(res.locale, Locale::Ru);
    }

    #[test]
    fn test_default_when_nothing_matches() {
        let res = resolve_locale(Some("de"), Some("fr"), Some("es-ES"), ALL, Locale::Uz);
        assert_eq!(res.locale, Locale::Uz);
        assert!(res.persist);

        let res = resolve_locale(None, None, None, ALL, Locale::Ru);
        assert_eq!(res.locale, Locale::Ru);
    }

    #[test]
    fn test_unsupported_member_is_skipped() {
        let supported = [Locale::Ru, Locale::Uz];
        let res = resolve_locale(Some("en"), None, Some("en-GB"), &supported, Locale::Ru);
        assert_eq!(res.locale, Locale::Ru);
    }

    #[test]
    fn test_always_returns_supported_member() {
        let inputs = [None, Some(""), Some("ru"), Some("uz"), Some("en"), Some("xx"), Some("en-US")];
        for query in inputs {
            for cookie in inputs {
                for header in inputs {
                    let res = resolve_locale(query, cookie, header, ALL, Locale::Ru);
                    assert!(ALL.contains(&res.locale));
                    assert_eq!(res.persist, cookie != Some(res.locale.code()));
                }
            }
        }
    }
}
