//! UniFFI export layer: Swift bindings for the keyboard runtime.
//!
//! Each public type here maps to a generated Swift class, struct, or enum.

mod keyboard;
mod settings;
mod types;

pub use keyboard::KbKeyboard;
pub use settings::KbSettings;
pub use types::{
    KbAppearance, KbAutocomplete, KbColorScheme, KbContextChange, KbContextSnapshot,
    KbDeviceType, KbError, KbHostState, KbKeyboardCase, KbKeyboardType, KbLifecycleEvent, KbSize,
};

use std::path::Path;

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

#[uniffi::export]
fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Load a custom config TOML. Must run before any keyboard is created.
#[uniffi::export]
fn config_load(path: String) -> Result<(), KbError> {
    let content = std::fs::read_to_string(&path).map_err(|e| KbError::Io {
        msg: format!("{path}: {e}"),
    })?;
    keyctx_core::config::init_custom(content)
        .map_err(|e| KbError::InvalidData { msg: e.to_string() })?;
    Ok(())
}

#[uniffi::export]
fn config_default() -> String {
    keyctx_core::config::default_toml().to_string()
}

#[uniffi::export]
fn trace_init(log_dir: String) {
    crate::trace_init::init_tracing(Path::new(&log_dir));
}
