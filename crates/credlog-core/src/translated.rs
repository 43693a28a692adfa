//! # Translated Strings
//!
//! Human-readable scheme data (credential names, attribute names, removed
//! attribute values) is localized: a map from language code to text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Language used when the requested one is missing.
pub const FALLBACK_LANGUAGE: &str = "en";

/// A string with one rendering per language, keyed by language code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslatedString(BTreeMap<String, String>);

impl TranslatedString {
    /// A translated string with the same text in every listed language.
    pub fn uniform(text: &str, languages: &[&str]) -> Self {
        Self(
            languages
                .iter()
                .map(|lang| (lang.to_string(), text.to_string()))
                .collect(),
        )
    }

    /// Add or replace one translation.
    pub fn with(mut self, language: &str, text: &str) -> Self {
        self.0.insert(language.to_string(), text.to_string());
        self
    }

    /// The text for `language`, falling back to English and then to any
    /// available translation.
    pub fn get(&self, language: &str) -> Option<&str> {
        self.0
            .get(language)
            .or_else(|| self.0.get(FALLBACK_LANGUAGE))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
    }

    /// True if no translation is present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(language, text)` pairs in language order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<const N: usize> From<[(&str, &str); N]> for TranslatedString {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_english_then_any() {
        let s = TranslatedString::from([("en", "Student card"), ("nl", "Studentenpas")]);
        assert_eq!(s.get("nl"), Some("Studentenpas"));
        assert_eq!(s.get("de"), Some("Student card"));

        let only_nl = TranslatedString::from([("nl", "Studentenpas")]);
        assert_eq!(only_nl.get("de"), Some("Studentenpas"));
        assert_eq!(TranslatedString::default().get("en"), None);
    }

    #[test]
    fn serializes_as_plain_map() {
        let s = TranslatedString::uniform("Radboud", &["en", "nl"]);
        assert_eq!(
            serde_json::to_string(&s).unwrap(),
            r#"{"en":"Radboud","nl":"Radboud"}"#
        );
    }
}
