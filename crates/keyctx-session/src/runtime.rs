use std::sync::{Arc, Mutex, PoisonError};

use keyctx_core::clock::{Clock, SystemClock};
use keyctx_core::config::config;
use keyctx_core::store::{SettingsStore, SettingsStoreExt};
use keyctx_core::{
    ColorScheme, DeviceType, KeyboardAppearance, KeyboardType, Locale, Observable, ProxyHandle,
    Size, TextInputMode,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::autocomplete::{AutocompleteContext, AutocompleteValues};
use crate::context::KeyboardContext;
use crate::host::HostControllerAdapter;
use crate::queue::MainQueue;
use crate::settings::SettingsSnapshot;
use crate::sync::{SettingsSyncBridge, SyncOutcome};

pub const CONTEXT_DOMAIN: &str = "context";

/// Host lifecycle signals that trigger a host sync and a settings check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleEvent {
    Initialized,
    ViewWillAppear,
    TraitCollectionChanged,
    TextInputModeChanged,
    ViewportChanged,
}

/// One observed change, in notification order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ContextChange {
    Locale(Locale),
    Locales(Vec<Locale>),
    KeyboardType(KeyboardType),
    PrefersAutocomplete(bool),
    KeyboardDictationReplacement(Option<String>),
    IsAutocapitalizationEnabled(bool),
    TextInputProxy(Option<ProxyHandle>),
    ScreenSize(Size),
    HasDictationKey(bool),
    HasFullAccess(bool),
    PrimaryLanguage(Option<String>),
    NeedsInputModeSwitchKey(bool),
    TextInputMode(Option<TextInputMode>),
    KeyboardAppearance(KeyboardAppearance),
    ColorScheme(ColorScheme),
    OriginalTextDocumentProxy(Option<ProxyHandle>),
    IsAutocompleteEnabled(bool),
    IsAutocorrectEnabled(bool),
    SuggestionsDisplayCount(u32),
}

/// Read-only copy of the whole context, for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSnapshot {
    pub locale_identifier: String,
    pub locales: Vec<String>,
    pub keyboard_type: KeyboardType,
    pub device_type: DeviceType,
    pub screen_size: Size,
    pub has_dictation_key: bool,
    pub has_full_access: bool,
    pub primary_language: Option<String>,
    pub needs_input_mode_switch_key: bool,
    pub text_input_mode: Option<TextInputMode>,
    pub keyboard_appearance: KeyboardAppearance,
    pub color_scheme: ColorScheme,
    pub prefers_autocomplete: bool,
    pub keyboard_dictation_replacement: Option<String>,
    pub is_autocapitalization_enabled: bool,
    pub text_document_proxy: Option<ProxyHandle>,
    pub autocomplete: AutocompleteValues,
}

type ChangeSink = Arc<Mutex<Vec<ContextChange>>>;

fn record<T>(observable: &Observable<T>, sink: &ChangeSink, wrap: fn(T) -> ContextChange)
where
    T: PartialEq + Clone + Send + 'static,
{
    let sink = Arc::clone(sink);
    observable.subscribe(move |value: &T| {
        sink.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(wrap(value.clone()));
    });
}

/// Store key of the persisted locale identifier.
pub fn locale_identifier_key() -> String {
    config().store_key(CONTEXT_DOMAIN, "localeIdentifier")
}

/// Single owner of the keyboard state in one extension process.
///
/// Host sync, deferred host writes and settings propagation all run through
/// `&mut self`, so they are serialized by construction.
pub struct KeyboardRuntime {
    context: KeyboardContext,
    autocomplete: AutocompleteContext,
    bridge: SettingsSyncBridge,
    queue: MainQueue<KeyboardContext>,
    host: Option<Arc<dyn HostControllerAdapter>>,
    changes: ChangeSink,
}

impl KeyboardRuntime {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>) -> Self {
        let locale_key = locale_identifier_key();
        let mut context = KeyboardContext::new();
        if let Some(identifier) = store.get_value::<String>(&locale_key) {
            debug!(%identifier, "restoring persisted locale");
            context.set_locale_identifier(&identifier);
        }

        let snapshot = SettingsSnapshot::with_clock(Arc::clone(&store), clock);
        let runtime = Self {
            context,
            autocomplete: AutocompleteContext::new(),
            bridge: SettingsSyncBridge::new(snapshot),
            queue: MainQueue::new(),
            host: None,
            changes: Arc::default(),
        };
        runtime.persist_locale(store, locale_key);
        runtime.record_changes();
        runtime
    }

    /// Attach a host adapter. Without one, lifecycle events skip the host sync
    /// and the mirrored fields keep their defaults.
    pub fn with_host(mut self, host: Arc<dyn HostControllerAdapter>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn set_host(&mut self, host: Option<Arc<dyn HostControllerAdapter>>) {
        self.host = host;
    }

    pub fn has_host(&self) -> bool {
        self.host.is_some()
    }

    fn persist_locale(&self, store: Arc<dyn SettingsStore>, key: String) {
        self.context.observe_locale().subscribe(move |locale: &Locale| {
            if let Err(e) = store.set_value(&key, locale.identifier()) {
                warn!(error = %e, "failed to persist locale identifier");
            }
        });
    }

    fn record_changes(&self) {
        let c = &self.context;
        let sink = &self.changes;
        record(c.observe_locale(), sink, ContextChange::Locale);
        record(c.observe_locales(), sink, ContextChange::Locales);
        record(c.observe_keyboard_type(), sink, ContextChange::KeyboardType);
        record(c.observe_prefers_autocomplete(), sink, ContextChange::PrefersAutocomplete);
        record(
            c.observe_keyboard_dictation_replacement(),
            sink,
            ContextChange::KeyboardDictationReplacement,
        );
        record(
            c.observe_is_autocapitalization_enabled(),
            sink,
            ContextChange::IsAutocapitalizationEnabled,
        );
        record(c.observe_text_input_proxy(), sink, ContextChange::TextInputProxy);
        record(c.observe_screen_size(), sink, ContextChange::ScreenSize);
        record(c.observe_has_dictation_key(), sink, ContextChange::HasDictationKey);
        record(c.observe_has_full_access(), sink, ContextChange::HasFullAccess);
        record(c.observe_primary_language(), sink, ContextChange::PrimaryLanguage);
        record(
            c.observe_needs_input_mode_switch_key(),
            sink,
            ContextChange::NeedsInputModeSwitchKey,
        );
        record(c.observe_text_input_mode(), sink, ContextChange::TextInputMode);
        record(c.observe_keyboard_appearance(), sink, ContextChange::KeyboardAppearance);
        record(c.observe_color_scheme(), sink, ContextChange::ColorScheme);
        record(
            c.observe_original_text_document_proxy(),
            sink,
            ContextChange::OriginalTextDocumentProxy,
        );

        let a = &self.autocomplete;
        record(a.observe_is_autocomplete_enabled(), sink, ContextChange::IsAutocompleteEnabled);
        record(a.observe_is_autocorrect_enabled(), sink, ContextChange::IsAutocorrectEnabled);
        record(
            a.observe_suggestions_display_count(),
            sink,
            ContextChange::SuggestionsDisplayCount,
        );
    }

    /// Sync with the host (if attached), pick up out-of-process settings
    /// edits, and propagate settings if due.
    pub fn handle_lifecycle(&mut self, event: LifecycleEvent) -> SyncOutcome {
        debug!(?event, has_host = self.host.is_some(), "lifecycle event");
        if let Some(host) = &self.host {
            let state = host.snapshot();
            self.context.sync_with_host(&state, &mut self.queue);
        }
        self.bridge.reload_and_sync(&mut self.autocomplete)
    }

    /// Pick up out-of-process settings edits and propagate settings if due,
    /// without touching the host.
    pub fn maybe_sync_settings(&mut self) -> SyncOutcome {
        self.bridge.reload_and_sync(&mut self.autocomplete)
    }

    /// Advance the main queue by one turn. Returns the number of jobs run.
    pub fn run_pending(&mut self) -> usize {
        self.queue.run_turn(&mut self.context)
    }

    pub fn run_until_idle(&mut self) -> usize {
        self.queue.run_until_idle(&mut self.context)
    }

    pub fn pending_jobs(&self) -> usize {
        self.queue.len()
    }

    pub fn context(&self) -> &KeyboardContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut KeyboardContext {
        &mut self.context
    }

    pub fn autocomplete(&self) -> &AutocompleteContext {
        &self.autocomplete
    }

    pub fn settings(&self) -> &SettingsSnapshot {
        self.bridge.snapshot()
    }

    pub fn settings_mut(&mut self) -> &mut SettingsSnapshot {
        self.bridge.snapshot_mut()
    }

    /// Drain the changes recorded since the last call.
    pub fn take_changes(&self) -> Vec<ContextChange> {
        std::mem::take(&mut *self.changes.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        let c = &self.context;
        ContextSnapshot {
            locale_identifier: c.locale_identifier().to_string(),
            locales: c
                .locales()
                .iter()
                .map(|l| l.identifier().to_string())
                .collect(),
            keyboard_type: c.keyboard_type().clone(),
            device_type: *c.device_type(),
            screen_size: *c.screen_size(),
            has_dictation_key: *c.has_dictation_key(),
            has_full_access: *c.has_full_access(),
            primary_language: c.primary_language().clone(),
            needs_input_mode_switch_key: *c.needs_input_mode_switch_key(),
            text_input_mode: c.text_input_mode().clone(),
            keyboard_appearance: *c.keyboard_appearance(),
            color_scheme: *c.color_scheme(),
            prefers_autocomplete: *c.prefers_autocomplete(),
            keyboard_dictation_replacement: c.keyboard_dictation_replacement().clone(),
            is_autocapitalization_enabled: *c.is_autocapitalization_enabled(),
            text_document_proxy: c.text_document_proxy(),
            autocomplete: self.autocomplete.values(),
        }
    }
}

impl std::fmt::Debug for KeyboardRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardRuntime")
            .field("context", &self.context)
            .field("autocomplete", &self.autocomplete)
            .field("queue", &self.queue)
            .field("has_host", &self.host.is_some())
            .finish_non_exhaustive()
    }
}
