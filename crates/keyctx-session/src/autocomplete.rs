use keyctx_core::config::config;
use keyctx_core::Observable;
use serde::{Deserialize, Serialize};

/// The three user-configurable autocomplete values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteValues {
    pub is_autocomplete_enabled: bool,
    pub is_autocorrect_enabled: bool,
    pub suggestions_display_count: u32,
}

impl Default for AutocompleteValues {
    fn default() -> Self {
        let d = &config().autocomplete;
        Self {
            is_autocomplete_enabled: d.is_autocomplete_enabled,
            is_autocorrect_enabled: d.is_autocorrect_enabled,
            suggestions_display_count: d.suggestions_display_count,
        }
    }
}

/// Live autocomplete toggles read by the suggestion layer.
#[derive(Debug)]
pub struct AutocompleteContext {
    is_autocomplete_enabled: Observable<bool>,
    is_autocorrect_enabled: Observable<bool>,
    suggestions_display_count: Observable<u32>,
}

impl AutocompleteContext {
    pub fn new() -> Self {
        Self::with_values(AutocompleteValues::default())
    }

    pub fn with_values(values: AutocompleteValues) -> Self {
        Self {
            is_autocomplete_enabled: Observable::new(values.is_autocomplete_enabled),
            is_autocorrect_enabled: Observable::new(values.is_autocorrect_enabled),
            suggestions_display_count: Observable::new(values.suggestions_display_count),
        }
    }

    pub fn is_autocomplete_enabled(&self) -> bool {
        *self.is_autocomplete_enabled.get()
    }

    pub fn is_autocorrect_enabled(&self) -> bool {
        *self.is_autocorrect_enabled.get()
    }

    pub fn suggestions_display_count(&self) -> u32 {
        *self.suggestions_display_count.get()
    }

    pub fn values(&self) -> AutocompleteValues {
        AutocompleteValues {
            is_autocomplete_enabled: self.is_autocomplete_enabled(),
            is_autocorrect_enabled: self.is_autocorrect_enabled(),
            suggestions_display_count: self.suggestions_display_count(),
        }
    }

    pub fn set_is_autocomplete_enabled(&mut self, value: bool) {
        self.is_autocomplete_enabled.set(value);
    }

    pub fn set_is_autocorrect_enabled(&mut self, value: bool) {
        self.is_autocorrect_enabled.set(value);
    }

    pub fn set_suggestions_display_count(&mut self, value: u32) {
        self.suggestions_display_count.set(value);
    }

    pub fn observe_is_autocomplete_enabled(&self) -> &Observable<bool> {
        &self.is_autocomplete_enabled
    }

    pub fn observe_is_autocorrect_enabled(&self) -> &Observable<bool> {
        &self.is_autocorrect_enabled
    }

    pub fn observe_suggestions_display_count(&self) -> &Observable<u32> {
        &self.suggestions_display_count
    }

    /// Total writes across the three fields, changed or not.
    pub fn writes(&self) -> u64 {
        self.is_autocomplete_enabled.writes()
            + self.is_autocorrect_enabled.writes()
            + self.suggestions_display_count.writes()
    }
}

impl Default for AutocompleteContext {
    fn default() -> Self {
        Self::new()
    }
}
