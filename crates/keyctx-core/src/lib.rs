//! Value types and pure logic for the keyboard context.
//!
//! Nothing in this crate owns live keyboard state; see `keyctx-session` for
//! the context object and the settings bridge built on top of these types.

pub mod clock;
pub mod config;
pub mod device;
pub mod keyboard;
pub mod locale;
pub mod observable;
pub mod store;

pub use device::{ColorScheme, DeviceType, KeyboardAppearance, ProxyHandle, Size, TextInputMode};
pub use keyboard::{KeyboardCase, KeyboardType};
pub use locale::{KeyboardLocale, Locale, LocaleError};
pub use observable::{ListenerHandle, ListenerId, Observable};
