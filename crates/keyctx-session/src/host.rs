//! Boundary to the host input controller that owns the text-editing surface.
//!
//! The host pushes a [`HostState`] snapshot into the context at lifecycle
//! points. The context trusts it verbatim.

use std::sync::{Mutex, PoisonError};

use keyctx_core::{ColorScheme, KeyboardAppearance, ProxyHandle, Size, TextInputMode};
use serde::{Deserialize, Serialize};

/// Appearance values derived from the host's trait collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostTraits {
    pub keyboard_appearance: KeyboardAppearance,
    pub color_scheme: ColorScheme,
}

/// Read-only snapshot of the host controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostState {
    pub has_dictation_key: bool,
    pub has_full_access: bool,
    pub primary_language: Option<String>,
    pub screen_size: Size,
    pub text_input_mode: Option<TextInputMode>,
    pub traits: HostTraits,
    pub needs_input_mode_switch_key: bool,
    pub text_document_proxy: Option<ProxyHandle>,
}

impl HostState {
    /// Fields the host only resolves after a layout pass.
    pub(crate) fn deferred_fields(&self) -> DeferredHostFields {
        DeferredHostFields {
            needs_input_mode_switch_key: self.needs_input_mode_switch_key,
            traits: self.traits,
            text_document_proxy: self.text_document_proxy,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DeferredHostFields {
    pub(crate) needs_input_mode_switch_key: bool,
    pub(crate) traits: HostTraits,
    pub(crate) text_document_proxy: Option<ProxyHandle>,
}

/// Source of host snapshots.
pub trait HostControllerAdapter: Send + Sync {
    fn snapshot(&self) -> HostState;
}

/// Adapter holding the last state pushed by the host.
///
/// Used by the FFI layer, where Swift pushes values instead of being polled.
#[derive(Debug, Default)]
pub struct StaticHost {
    state: Mutex<HostState>,
}

impl StaticHost {
    pub fn new(state: HostState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn set(&self, state: HostState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub fn update(&self, f: impl FnOnce(&mut HostState)) {
        f(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

impl HostControllerAdapter for StaticHost {
    fn snapshot(&self) -> HostState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
