//! Locale identifiers and the predefined keyboard locales.
//!
//! A `Locale` owns its identifier string; the parsed subtags are derived from
//! it once at construction, so an identifier and its locale can never drift
//! apart. Two locales are equal iff their identifiers are equal.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::config::config;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleError {
    #[error("empty locale identifier")]
    Empty,
    #[error("invalid subtag {subtag:?} in locale identifier {identifier:?}")]
    InvalidSubtag { identifier: String, subtag: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Locale {
    identifier: String,
    language: Option<String>,
    script: Option<String>,
    region: Option<String>,
}

impl Locale {
    /// Best-effort construction, never fails.
    ///
    /// Well-formed tags are case-normalized (`EN-us` becomes `en-US`). An empty
    /// identifier falls back to the configured default locale. Any other
    /// malformed identifier is kept verbatim with no parsed subtags.
    pub fn new(identifier: &str) -> Self {
        match Self::parse(identifier) {
            Ok(locale) => locale,
            Err(LocaleError::Empty) => Self::fallback(),
            Err(e) => {
                tracing::debug!(error = %e, "keeping malformed locale identifier verbatim");
                Self {
                    identifier: identifier.trim().to_string(),
                    language: None,
                    script: None,
                    region: None,
                }
            }
        }
    }

    /// Strict parse of a `language[-Script][-REGION][-variant...]` tag.
    ///
    /// Both `-` and `_` separators are accepted; the first separator seen is
    /// kept in the normalized identifier.
    pub fn parse(identifier: &str) -> Result<Self, LocaleError> {
        let trimmed = identifier.trim();
        if trimmed.is_empty() {
            return Err(LocaleError::Empty);
        }
        let separator = trimmed
            .chars()
            .find(|c| *c == '-' || *c == '_')
            .unwrap_or('_');
        let invalid = |subtag: &str| LocaleError::InvalidSubtag {
            identifier: trimmed.to_string(),
            subtag: subtag.to_string(),
        };

        let mut subtags = trimmed.split(['-', '_']).peekable();
        let first = subtags.next().unwrap_or_default();
        if !is_language(first) {
            return Err(invalid(first));
        }
        let language = first.to_ascii_lowercase();
        let mut parts = vec![language.clone()];

        let script = match subtags.peek() {
            Some(s) if is_script(s) => {
                let s = titlecase(s);
                subtags.next();
                parts.push(s.clone());
                Some(s)
            }
            _ => None,
        };

        let region = match subtags.peek() {
            Some(s) if is_region(s) => {
                let s = s.to_ascii_uppercase();
                subtags.next();
                parts.push(s.clone());
                Some(s)
            }
            _ => None,
        };

        for variant in subtags {
            if variant.is_empty()
                || variant.len() > 8
                || !variant.chars().all(|c| c.is_ascii_alphanumeric())
            {
                return Err(invalid(variant));
            }
            parts.push(variant.to_ascii_lowercase());
        }

        Ok(Self {
            identifier: parts.join(&separator.to_string()),
            language: Some(language),
            script,
            region,
        })
    }

    /// The configured default locale (`[locale] default`).
    pub fn fallback() -> Self {
        Self::parse(&config().locale.default).unwrap_or_else(|_| Self {
            identifier: "en".to_string(),
            language: Some("en".to_string()),
            script: None,
            region: None,
        })
    }

    /// The device locale read from `LC_ALL`, `LC_MESSAGES` or `LANG`.
    ///
    /// Encoding and modifier suffixes (`.UTF-8`, `@euro`) are stripped, and the
    /// POSIX `C`/`POSIX` locales map to the configured default.
    pub fn current() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.is_empty())
            .and_then(|raw| {
                let tag = raw.split(['.', '@']).next().unwrap_or_default();
                if tag.eq_ignore_ascii_case("c") || tag.eq_ignore_ascii_case("posix") {
                    None
                } else {
                    Self::parse(tag).ok()
                }
            })
            .unwrap_or_else(Self::fallback)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn language_code(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn script_code(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn region_code(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

fn is_language(s: &str) -> bool {
    matches!(s.len(), 2..=3 | 5..=8) && s.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_script(s: &str) -> bool {
    s.len() == 4 && s.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_region(s: &str) -> bool {
    (s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()))
        || (s.len() == 3 && s.chars().all(|c| c.is_ascii_digit()))
}

fn titlecase(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        if i == 0 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

impl PartialEq for Locale {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for Locale {}

impl Hash for Locale {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

impl From<String> for Locale {
    fn from(identifier: String) -> Self {
        Self::new(&identifier)
    }
}

impl From<&str> for Locale {
    fn from(identifier: &str) -> Self {
        Self::new(identifier)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.identifier
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::fallback()
    }
}

macro_rules! keyboard_locales {
    ($($variant:ident => $id:literal),* $(,)?) => {
        /// Locales with a dedicated keyboard layout.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum KeyboardLocale {
            $($variant,)*
        }

        impl KeyboardLocale {
            pub const ALL: &'static [KeyboardLocale] = &[$(KeyboardLocale::$variant,)*];

            pub fn id(self) -> &'static str {
                match self {
                    $(KeyboardLocale::$variant => $id,)*
                }
            }
        }
    };
}

keyboard_locales! {
    Arabic => "ar",
    Belarusian => "be",
    Bulgarian => "bg",
    Catalan => "ca",
    Croatian => "hr",
    Czech => "cs",
    Danish => "da",
    Dutch => "nl",
    English => "en",
    EnglishGb => "en_GB",
    EnglishUs => "en_US",
    Estonian => "et",
    Finnish => "fi",
    French => "fr",
    German => "de",
    Greek => "el",
    Hebrew => "he",
    Hungarian => "hu",
    Icelandic => "is",
    Italian => "it",
    Latvian => "lv",
    Lithuanian => "lt",
    Norwegian => "nb",
    Persian => "fa",
    Polish => "pl",
    Portuguese => "pt_PT",
    PortugueseBrazil => "pt_BR",
    Romanian => "ro",
    Russian => "ru",
    Slovak => "sk",
    Slovenian => "sl",
    Spanish => "es",
    Swedish => "sv",
    Turkish => "tr",
    Ukrainian => "uk",
}

impl KeyboardLocale {
    pub fn locale(self) -> Locale {
        Locale::new(self.id())
    }

    /// Exact identifier match after normalization.
    pub fn from_locale(locale: &Locale) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kl| kl.locale() == *locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_language_only() {
        let l = Locale::parse("da").unwrap();
        assert_eq!(l.identifier(), "da");
        assert_eq!(l.language_code(), Some("da"));
        assert_eq!(l.region_code(), None);
    }

    #[test]
    fn parse_normalizes_case_and_keeps_separator() {
        let l = Locale::parse("EN-us").unwrap();
        assert_eq!(l.identifier(), "en-US");
        let l = Locale::parse("pt_br").unwrap();
        assert_eq!(l.identifier(), "pt_BR");
        assert_eq!(l.region_code(), Some("BR"));
    }

    #[test]
    fn parse_script_and_region() {
        let l = Locale::parse("zh-hant-tw").unwrap();
        assert_eq!(l.identifier(), "zh-Hant-TW");
        assert_eq!(l.script_code(), Some("Hant"));
        assert_eq!(l.region_code(), Some("TW"));
    }

    #[test]
    fn parse_numeric_region_and_variant() {
        let l = Locale::parse("es-419").unwrap();
        assert_eq!(l.region_code(), Some("419"));
        let l = Locale::parse("de-DE-1996").unwrap();
        assert_eq!(l.identifier(), "de-DE-1996");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!(Locale::parse("  "), Err(LocaleError::Empty));
        assert!(matches!(
            Locale::parse("1234"),
            Err(LocaleError::InvalidSubtag { .. })
        ));
        assert!(matches!(
            Locale::parse("en--US"),
            Err(LocaleError::InvalidSubtag { .. })
        ));
        assert!(matches!(
            Locale::parse("en-US-!!"),
            Err(LocaleError::InvalidSubtag { .. })
        ));
    }

    #[test]
    fn new_keeps_malformed_identifier_verbatim() {
        let l = Locale::new("not a locale!");
        assert_eq!(l.identifier(), "not a locale!");
        assert_eq!(l.language_code(), None);
    }

    #[test]
    fn new_with_empty_identifier_falls_back() {
        let l = Locale::new("");
        assert_eq!(l, Locale::fallback());
        assert_eq!(l.identifier(), "en");
    }

    #[test]
    fn equality_is_identifier_equality() {
        assert_eq!(Locale::new("sv"), Locale::new("SV"));
        assert_ne!(Locale::new("sv"), Locale::new("sv_FI"));
    }

    #[test]
    fn serde_uses_identifier_string() {
        let json = serde_json::to_string(&Locale::new("en_GB")).unwrap();
        assert_eq!(json, "\"en_GB\"");
        let back: Locale = serde_json::from_str("\"fi\"").unwrap();
        assert_eq!(back.identifier(), "fi");
    }

    #[test]
    fn keyboard_locale_ids_parse_cleanly() {
        for kl in KeyboardLocale::ALL {
            let locale = Locale::parse(kl.id()).unwrap();
            assert_eq!(locale.identifier(), kl.id());
            assert_eq!(KeyboardLocale::from_locale(&locale), Some(*kl));
        }
    }

    #[test]
    fn keyboard_locale_lookup() {
        assert_eq!(
            KeyboardLocale::from_locale(&Locale::new("da")),
            Some(KeyboardLocale::Danish)
        );
        assert_eq!(KeyboardLocale::Catalan.locale().identifier(), "ca");
        assert_eq!(KeyboardLocale::from_locale(&Locale::new("xx")), None);
    }
}
