use keyctx_core::{
    ColorScheme, DeviceType, KeyboardAppearance, KeyboardCase, KeyboardType, ProxyHandle, Size,
    TextInputMode,
};
use keyctx_session::{
    AutocompleteValues, ContextChange, ContextSnapshot, HostState, HostTraits, LifecycleEvent,
};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum KbError {
    #[error("IO error: {msg}")]
    Io { msg: String },
    #[error("invalid data: {msg}")]
    InvalidData { msg: String },
}

impl From<keyctx_core::store::StoreError> for KbError {
    fn from(e: keyctx_core::store::StoreError) -> Self {
        match e {
            keyctx_core::store::StoreError::Io(e) => KbError::Io { msg: e.to_string() },
            other => KbError::InvalidData {
                msg: other.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, uniffi::Record)]
pub struct KbSize {
    pub width: f64,
    pub height: f64,
}

/// Host controller values pushed from Swift at a lifecycle point.
#[derive(Clone, Debug, uniffi::Record)]
pub struct KbHostState {
    pub has_dictation_key: bool,
    pub has_full_access: bool,
    pub primary_language: Option<String>,
    pub screen_size: KbSize,
    /// Primary language of the active text input mode, if the host has one.
    pub text_input_mode: Option<String>,
    pub needs_input_mode_switch_key: bool,
    pub keyboard_appearance: KbAppearance,
    pub color_scheme: KbColorScheme,
    pub text_document_proxy: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Record)]
pub struct KbAutocomplete {
    pub is_autocomplete_enabled: bool,
    pub is_autocorrect_enabled: bool,
    pub suggestions_display_count: u32,
}

#[derive(Clone, Debug, uniffi::Record)]
pub struct KbContextSnapshot {
    pub locale_identifier: String,
    pub locales: Vec<String>,
    pub keyboard_type: KbKeyboardType,
    pub device_type: KbDeviceType,
    pub screen_size: KbSize,
    pub has_dictation_key: bool,
    pub has_full_access: bool,
    pub primary_language: Option<String>,
    pub needs_input_mode_switch_key: bool,
    pub text_input_mode: Option<String>,
    pub keyboard_appearance: KbAppearance,
    pub color_scheme: KbColorScheme,
    pub prefers_autocomplete: bool,
    pub keyboard_dictation_replacement: Option<String>,
    pub is_autocapitalization_enabled: bool,
    pub text_document_proxy: Option<u64>,
    pub autocomplete: KbAutocomplete,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum KbKeyboardCase {
    Auto,
    Lowercased,
    Uppercased,
    CapsLocked,
}

#[derive(Clone, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum KbKeyboardType {
    Alphabetic { keyboard_case: KbKeyboardCase },
    Numeric,
    Symbolic,
    Email,
    Url,
    Emojis,
    Images,
    Custom { named: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum KbDeviceType {
    Phone,
    Pad,
    Mac,
    Tv,
    Watch,
    Vision,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum KbAppearance {
    Default,
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum KbColorScheme {
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum KbLifecycleEvent {
    Initialized,
    ViewWillAppear,
    TraitCollectionChanged,
    TextInputModeChanged,
    ViewportChanged,
}

/// One observed context change, drained by `KbKeyboard::take_changes`.
#[derive(Clone, Debug, PartialEq, uniffi::Enum)]
pub enum KbContextChange {
    Locale { identifier: String },
    Locales { identifiers: Vec<String> },
    KeyboardType { keyboard_type: KbKeyboardType },
    PrefersAutocomplete { value: bool },
    KeyboardDictationReplacement { value: Option<String> },
    IsAutocapitalizationEnabled { value: bool },
    TextInputProxy { proxy: Option<u64> },
    ScreenSize { size: KbSize },
    HasDictationKey { value: bool },
    HasFullAccess { value: bool },
    PrimaryLanguage { value: Option<String> },
    NeedsInputModeSwitchKey { value: bool },
    TextInputMode { primary_language: Option<String> },
    KeyboardAppearance { appearance: KbAppearance },
    ColorScheme { scheme: KbColorScheme },
    OriginalTextDocumentProxy { proxy: Option<u64> },
    IsAutocompleteEnabled { value: bool },
    IsAutocorrectEnabled { value: bool },
    SuggestionsDisplayCount { value: u32 },
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

impl From<Size> for KbSize {
    fn from(s: Size) -> Self {
        Self {
            width: s.width,
            height: s.height,
        }
    }
}

impl From<KbSize> for Size {
    fn from(s: KbSize) -> Self {
        Size::new(s.width, s.height)
    }
}

impl From<KeyboardCase> for KbKeyboardCase {
    fn from(c: KeyboardCase) -> Self {
        match c {
            KeyboardCase::Auto => Self::Auto,
            KeyboardCase::Lowercased => Self::Lowercased,
            KeyboardCase::Uppercased => Self::Uppercased,
            KeyboardCase::CapsLocked => Self::CapsLocked,
        }
    }
}

impl From<KbKeyboardCase> for KeyboardCase {
    fn from(c: KbKeyboardCase) -> Self {
        match c {
            KbKeyboardCase::Auto => Self::Auto,
            KbKeyboardCase::Lowercased => Self::Lowercased,
            KbKeyboardCase::Uppercased => Self::Uppercased,
            KbKeyboardCase::CapsLocked => Self::CapsLocked,
        }
    }
}

impl From<KeyboardType> for KbKeyboardType {
    fn from(t: KeyboardType) -> Self {
        match t {
            KeyboardType::Alphabetic(c) => Self::Alphabetic {
                keyboard_case: c.into(),
            },
            KeyboardType::Numeric => Self::Numeric,
            KeyboardType::Symbolic => Self::Symbolic,
            KeyboardType::Email => Self::Email,
            KeyboardType::Url => Self::Url,
            KeyboardType::Emojis => Self::Emojis,
            KeyboardType::Images => Self::Images,
            KeyboardType::Custom { named } => Self::Custom { named },
        }
    }
}

impl From<KbKeyboardType> for KeyboardType {
    fn from(t: KbKeyboardType) -> Self {
        match t {
            KbKeyboardType::Alphabetic { keyboard_case } => {
                Self::Alphabetic(keyboard_case.into())
            }
            KbKeyboardType::Numeric => Self::Numeric,
            KbKeyboardType::Symbolic => Self::Symbolic,
            KbKeyboardType::Email => Self::Email,
            KbKeyboardType::Url => Self::Url,
            KbKeyboardType::Emojis => Self::Emojis,
            KbKeyboardType::Images => Self::Images,
            KbKeyboardType::Custom { named } => Self::Custom { named },
        }
    }
}

impl From<DeviceType> for KbDeviceType {
    fn from(d: DeviceType) -> Self {
        match d {
            DeviceType::Phone => Self::Phone,
            DeviceType::Pad => Self::Pad,
            DeviceType::Mac => Self::Mac,
            DeviceType::Tv => Self::Tv,
            DeviceType::Watch => Self::Watch,
            DeviceType::Vision => Self::Vision,
            DeviceType::Other => Self::Other,
        }
    }
}

impl From<KeyboardAppearance> for KbAppearance {
    fn from(a: KeyboardAppearance) -> Self {
        match a {
            KeyboardAppearance::Default => Self::Default,
            KeyboardAppearance::Light => Self::Light,
            KeyboardAppearance::Dark => Self::Dark,
        }
    }
}

impl From<KbAppearance> for KeyboardAppearance {
    fn from(a: KbAppearance) -> Self {
        match a {
            KbAppearance::Default => Self::Default,
            KbAppearance::Light => Self::Light,
            KbAppearance::Dark => Self::Dark,
        }
    }
}

impl From<ColorScheme> for KbColorScheme {
    fn from(c: ColorScheme) -> Self {
        match c {
            ColorScheme::Light => Self::Light,
            ColorScheme::Dark => Self::Dark,
        }
    }
}

impl From<KbColorScheme> for ColorScheme {
    fn from(c: KbColorScheme) -> Self {
        match c {
            KbColorScheme::Light => Self::Light,
            KbColorScheme::Dark => Self::Dark,
        }
    }
}

impl From<KbLifecycleEvent> for LifecycleEvent {
    fn from(e: KbLifecycleEvent) -> Self {
        match e {
            KbLifecycleEvent::Initialized => Self::Initialized,
            KbLifecycleEvent::ViewWillAppear => Self::ViewWillAppear,
            KbLifecycleEvent::TraitCollectionChanged => Self::TraitCollectionChanged,
            KbLifecycleEvent::TextInputModeChanged => Self::TextInputModeChanged,
            KbLifecycleEvent::ViewportChanged => Self::ViewportChanged,
        }
    }
}

impl From<AutocompleteValues> for KbAutocomplete {
    fn from(v: AutocompleteValues) -> Self {
        Self {
            is_autocomplete_enabled: v.is_autocomplete_enabled,
            is_autocorrect_enabled: v.is_autocorrect_enabled,
            suggestions_display_count: v.suggestions_display_count,
        }
    }
}

impl From<KbHostState> for HostState {
    fn from(h: KbHostState) -> Self {
        HostState {
            has_dictation_key: h.has_dictation_key,
            has_full_access: h.has_full_access,
            primary_language: h.primary_language,
            screen_size: h.screen_size.into(),
            text_input_mode: h.text_input_mode.map(|language| TextInputMode {
                primary_language: Some(language),
            }),
            traits: HostTraits {
                keyboard_appearance: h.keyboard_appearance.into(),
                color_scheme: h.color_scheme.into(),
            },
            needs_input_mode_switch_key: h.needs_input_mode_switch_key,
            text_document_proxy: h.text_document_proxy.map(ProxyHandle),
        }
    }
}

fn mode_language(mode: Option<TextInputMode>) -> Option<String> {
    mode.and_then(|m| m.primary_language)
}

fn proxy_id(proxy: Option<ProxyHandle>) -> Option<u64> {
    proxy.map(|p| p.0)
}

impl From<ContextSnapshot> for KbContextSnapshot {
    fn from(s: ContextSnapshot) -> Self {
        Self {
            locale_identifier: s.locale_identifier,
            locales: s.locales,
            keyboard_type: s.keyboard_type.into(),
            device_type: s.device_type.into(),
            screen_size: s.screen_size.into(),
            has_dictation_key: s.has_dictation_key,
            has_full_access: s.has_full_access,
            primary_language: s.primary_language,
            needs_input_mode_switch_key: s.needs_input_mode_switch_key,
            text_input_mode: mode_language(s.text_input_mode),
            keyboard_appearance: s.keyboard_appearance.into(),
            color_scheme: s.color_scheme.into(),
            prefers_autocomplete: s.prefers_autocomplete,
            keyboard_dictation_replacement: s.keyboard_dictation_replacement,
            is_autocapitalization_enabled: s.is_autocapitalization_enabled,
            text_document_proxy: proxy_id(s.text_document_proxy),
            autocomplete: s.autocomplete.into(),
        }
    }
}

impl From<ContextChange> for KbContextChange {
    fn from(c: ContextChange) -> Self {
        match c {
            ContextChange::Locale(l) => Self::Locale {
                identifier: l.identifier().to_string(),
            },
            ContextChange::Locales(ls) => Self::Locales {
                identifiers: ls.iter().map(|l| l.identifier().to_string()).collect(),
            },
            ContextChange::KeyboardType(t) => Self::KeyboardType {
                keyboard_type: t.into(),
            },
            ContextChange::PrefersAutocomplete(value) => Self::PrefersAutocomplete { value },
            ContextChange::KeyboardDictationReplacement(value) => {
                Self::KeyboardDictationReplacement { value }
            }
            ContextChange::IsAutocapitalizationEnabled(value) => {
                Self::IsAutocapitalizationEnabled { value }
            }
            ContextChange::TextInputProxy(p) => Self::TextInputProxy { proxy: proxy_id(p) },
            ContextChange::ScreenSize(s) => Self::ScreenSize { size: s.into() },
            ContextChange::HasDictationKey(value) => Self::HasDictationKey { value },
            ContextChange::HasFullAccess(value) => Self::HasFullAccess { value },
            ContextChange::PrimaryLanguage(value) => Self::PrimaryLanguage { value },
            ContextChange::NeedsInputModeSwitchKey(value) => {
                Self::NeedsInputModeSwitchKey { value }
            }
            ContextChange::TextInputMode(m) => Self::TextInputMode {
                primary_language: mode_language(m),
            },
            ContextChange::KeyboardAppearance(a) => Self::KeyboardAppearance {
                appearance: a.into(),
            },
            ContextChange::ColorScheme(c) => Self::ColorScheme { scheme: c.into() },
            ContextChange::OriginalTextDocumentProxy(p) => {
                Self::OriginalTextDocumentProxy { proxy: proxy_id(p) }
            }
            ContextChange::IsAutocompleteEnabled(value) => Self::IsAutocompleteEnabled { value },
            ContextChange::IsAutocorrectEnabled(value) => Self::IsAutocorrectEnabled { value },
            ContextChange::SuggestionsDisplayCount(value) => {
                Self::SuggestionsDisplayCount { value }
            }
        }
    }
}
