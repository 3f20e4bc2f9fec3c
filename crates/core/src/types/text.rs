//! Multilingual text fields and the accessor that turns them into UI strings.
//!
//! Records written before the catalog went trilingual store plain strings for
//! `title`/`description`. Both shapes deserialize into [`LocalizedText`], so
//! the distinction is made once, at the data-access boundary.

use serde::{Deserialize, Serialize};

use super::locale::Locale;

/// The same semantic string in every supported locale.
///
/// Missing keys deserialize as empty strings; completeness is enforced by
/// [`validation`](crate::validation) on input, not on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultilingualText {
    #[serde(default)]
    pub ru: String,
    #[serde(default)]
    pub uz: String,
    #[serde(default)]
    pub en: String,
}

impl MultilingualText {
    /// Build a value from the three translations.
    #[must_use]
    pub fn new(ru: impl Into<String>, uz: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            ru: ru.into(),
            uz: uz.into(),
            en: en.into(),
        }
    }

    /// Raw value for one locale (may be empty).
    #[must_use]
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Ru => &self.ru,
            Locale::Uz => &self.uz,
            Locale::En => &self.en,
        }
    }

    /// Locales whose value is blank after trimming.
    #[must_use]
    pub fn missing_locales(&self) -> Vec<Locale> {
        Locale::ALL
            .into_iter()
            .filter(|&locale| self.get(locale).trim().is_empty())
            .collect()
    }

    /// Resolve the display string for `locale`.
    ///
    /// Order: requested locale, then `primary`, then the remaining locales in
    /// [`Locale::ALL`] order, then the empty string.
    #[must_use]
    pub fn resolve(&self, locale: Locale, primary: Locale) -> &str {
        std::iter::once(locale)
            .chain(std::iter::once(primary))
            .chain(Locale::ALL)
            .map(|candidate| self.get(candidate))
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }
}

/// A stored text field: either a pre-migration plain string or a
/// [`MultilingualText`] record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    /// Plain string from records created before translations existed.
    Legacy(String),
    /// Per-locale variants.
    Multilingual(MultilingualText),
}

impl Default for LocalizedText {
    fn default() -> Self {
        Self::Multilingual(MultilingualText::default())
    }
}

impl From<MultilingualText> for LocalizedText {
    fn from(text: MultilingualText) -> Self {
        Self::Multilingual(text)
    }
}

impl LocalizedText {
    /// See [`localize`].
    #[must_use]
    pub fn resolve(&self, locale: Locale, primary: Locale) -> &str {
        localize(self, locale, primary)
    }
}

/// Resolve a stored text field for display.
///
/// Legacy strings are returned unchanged regardless of locale. This is the
/// only supported way to turn a stored title, description or feature into a
/// UI string.
#[must_use]
pub fn localize(text: &LocalizedText, locale: Locale, primary: Locale) -> &str {
    match text {
        LocalizedText::Legacy(value) => value,
        LocalizedText::Multilingual(text) => text.resolve(locale, primary),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pump() -> LocalizedText {
        MultilingualText::new("Насос", "Nasos", "Pump").into()
    }

    #[test]
    fn test_requested_locale_wins_when_present() {
        let text = pump();
        for locale in Locale::ALL {
            assert_eq!(
                localize(&text, locale, Locale::Ru),
                match locale {
                    Locale::Ru => "Насос",
                    Locale::Uz => "Nasos",
                    Locale::En => "Pump",
                }
            );
        }
    }

    #[test]
    fn test_falls_back_to_primary() {
        let text: LocalizedText = MultilingualText::new("Насос", "", "Pump").into();
        assert_eq!(localize(&text, Locale::Uz, Locale::En), "Pump");
        assert_eq!(localize(&text, Locale::Uz, Locale::Ru), "Насос");
    }

    #[test]
    fn test_falls_back_to_remaining_in_fixed_order() {
        let text: LocalizedText = MultilingualText::new("", "Nasos", "Pump").into();
        // requested en is present
        assert_eq!(localize(&text, Locale::En, Locale::Ru), "Pump");
        // requested ru empty, primary ru empty, first remaining non-empty is uz
        assert_eq!(localize(&text, Locale::Ru, Locale::Ru), "Nasos");
    }

    #[test]
    fn test_all_empty_yields_empty_string() {
        let text = LocalizedText::default();
        assert_eq!(localize(&text, Locale::En, Locale::Ru), "");
    }

    #[test]
    fn test_legacy_string_is_returned_unchanged() {
        let text = LocalizedText::Legacy("Old title".to_string());
        for locale in Locale::ALL {
            assert_eq!(localize(&text, locale, Locale::Ru), "Old title");
        }
    }

    #[test]
    fn test_deserializes_both_shapes() {
        let legacy: LocalizedText = serde_json::from_str("\"Feed pump\"").unwrap();
        assert_eq!(legacy, LocalizedText::Legacy("Feed pump".to_string()));

        let multi: LocalizedText =
            serde_json::from_str(r#"{"ru":"Насос","uz":"Nasos","en":"Pump"}"#).unwrap();
        assert_eq!(multi, pump());
    }

    #[test]
    fn test_partial_object_reads_missing_keys_as_empty() {
        let text: MultilingualText = serde_json::from_str(r#"{"en":"Pump"}"#).unwrap();
        assert_eq!(text.missing_locales(), vec![Locale::Ru, Locale::Uz]);
    }
}
