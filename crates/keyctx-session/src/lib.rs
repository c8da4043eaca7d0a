//! Live keyboard context and its synchronization with the host controller
//! and the shared settings store.
//!
//! `KeyboardRuntime` owns one `KeyboardContext` per extension process. The
//! host pushes capability snapshots into it at lifecycle points, and the
//! `SettingsSyncBridge` pulls out-of-process settings edits into the
//! `AutocompleteContext` whenever the freshness check says they drifted.

mod autocomplete;
mod context;
mod host;
mod queue;
mod runtime;
mod settings;
mod sync;

#[cfg(test)]
mod tests;

pub use autocomplete::{AutocompleteContext, AutocompleteValues};
pub use context::KeyboardContext;
pub use host::{HostControllerAdapter, HostState, HostTraits, StaticHost};
pub use queue::MainQueue;
pub use runtime::{
    locale_identifier_key, ContextChange, ContextSnapshot, KeyboardRuntime, LifecycleEvent,
    CONTEXT_DOMAIN,
};
pub use settings::{SettingsKeys, SettingsSnapshot, AUTOCOMPLETE_DOMAIN};
pub use sync::{maybe_sync, ChangedFields, SettingsSyncBridge, SyncOutcome};
