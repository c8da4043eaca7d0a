use serde::{Deserialize, Serialize};

/// Letter case of an alphabetic keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyboardCase {
    /// Let the host's autocapitalization rules pick the case.
    Auto,
    #[default]
    Lowercased,
    Uppercased,
    CapsLocked,
}

/// The input mode the keyboard currently shows.
///
/// Equality is structural, so `Alphabetic(Lowercased)` and
/// `Alphabetic(Uppercased)` are different types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyboardType {
    Alphabetic(KeyboardCase),
    Numeric,
    Symbolic,
    Email,
    Url,
    Emojis,
    Images,
    Custom { named: String },
}

impl Default for KeyboardType {
    fn default() -> Self {
        Self::Alphabetic(KeyboardCase::Lowercased)
    }
}

impl KeyboardType {
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom { named: name.into() }
    }

    pub fn is_alphabetic(&self) -> bool {
        matches!(self, Self::Alphabetic(_))
    }

    pub fn is_alphabetic_with(&self, case: KeyboardCase) -> bool {
        matches!(self, Self::Alphabetic(c) if *c == case)
    }

    /// Uppercased or caps-locked alphabetic keyboards.
    pub fn is_alphabetic_uppercased(&self) -> bool {
        matches!(
            self,
            Self::Alphabetic(KeyboardCase::Uppercased | KeyboardCase::CapsLocked)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_lowercased_alphabetic() {
        assert_eq!(
            KeyboardType::default(),
            KeyboardType::Alphabetic(KeyboardCase::Lowercased)
        );
    }

    #[test]
    fn equality_includes_associated_values() {
        assert_ne!(
            KeyboardType::Alphabetic(KeyboardCase::Lowercased),
            KeyboardType::Alphabetic(KeyboardCase::Uppercased)
        );
        assert_ne!(KeyboardType::custom("a"), KeyboardType::custom("b"));
        assert_eq!(KeyboardType::custom("a"), KeyboardType::custom("a"));
    }

    #[test]
    fn alphabetic_helpers() {
        let caps = KeyboardType::Alphabetic(KeyboardCase::CapsLocked);
        assert!(caps.is_alphabetic());
        assert!(caps.is_alphabetic_uppercased());
        assert!(caps.is_alphabetic_with(KeyboardCase::CapsLocked));
        assert!(!caps.is_alphabetic_with(KeyboardCase::Uppercased));
        assert!(!KeyboardType::Numeric.is_alphabetic());
        assert!(!KeyboardType::default().is_alphabetic_uppercased());
    }
}
