//! Supported site locales.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of the supported locale codes.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported locale: {0:?}")]
pub struct LocaleError(pub String);

/// One of the three languages the catalog is published in.
///
/// The declaration order is the fixed fallback order used by
/// [`localize`](crate::types::text::localize).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Russian.
    #[default]
    Ru,
    /// Uzbek.
    Uz,
    /// English.
    En,
}

impl Locale {
    /// Every supported locale, in fallback order.
    pub const ALL: [Self; 3] = [Self::Ru, Self::Uz, Self::En];

    /// Two-letter code used in URLs, cookies and `hreflang` attributes.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::Uz => "uz",
            Self::En => "en",
        }
    }

    /// Name of the language written in that language (for the switcher).
    #[must_use]
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::Ru => "Русский",
            Self::Uz => "O'zbekcha",
            Self::En => "English",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    /// Codes are matched exactly; `"EN"` and `"en-US"` are not locales.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ru" => Ok(Self::Ru),
            "uz" => Ok(Self::Uz),
            "en" => Ok(Self::En),
            other => Err(LocaleError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for locale in Locale::ALL {
            assert_eq!(locale.code().parse::<Locale>(), Ok(locale));
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert!("EN".parse::<Locale>().is_err());
        assert!("en-US".parse::<Locale>().is_err());
        assert!("".parse::<Locale>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Locale::Uz).ok();
        assert_eq!(json.as_deref(), Some("\"uz\""));
    }
}
