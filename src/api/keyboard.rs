use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use keyctx_core::store::{FileStore, MemoryStore, SettingsStore};
use keyctx_core::{KeyboardLocale, Locale};
use keyctx_session::{HostControllerAdapter, KeyboardRuntime, StaticHost, SyncOutcome};

use super::settings::check_display_count;
use super::types::{
    KbAutocomplete, KbContextChange, KbContextSnapshot, KbError, KbHostState, KbKeyboardType,
    KbLifecycleEvent,
};

/// One keyboard extension's live state.
///
/// Swift pushes host values with each lifecycle call and drains
/// [`KbKeyboard::take_changes`] to refresh its views.
#[derive(uniffi::Object)]
pub struct KbKeyboard {
    host: Arc<StaticHost>,
    runtime: Mutex<KeyboardRuntime>,
}

impl KbKeyboard {
    fn with_store(store: Arc<dyn SettingsStore>) -> Arc<Self> {
        Arc::new(Self {
            host: Arc::new(StaticHost::default()),
            runtime: Mutex::new(KeyboardRuntime::new(store)),
        })
    }

    fn runtime(&self) -> MutexGuard<'_, KeyboardRuntime> {
        self.runtime.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[uniffi::export]
impl KbKeyboard {
    /// Keyboard backed by `settings.json` in a shared app-group directory.
    #[uniffi::constructor]
    fn open(store_dir: String) -> Arc<Self> {
        Self::with_store(Arc::new(FileStore::in_dir(Path::new(&store_dir))))
    }

    /// Keyboard with process-local settings, for previews and tests.
    #[uniffi::constructor]
    fn in_memory() -> Arc<Self> {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Handle a lifecycle callback. `host` replaces the mirrored host state;
    /// pass `None` when no host controller is attached yet.
    ///
    /// Returns true if the settings sync changed any autocomplete value.
    fn handle_lifecycle(&self, event: KbLifecycleEvent, host: Option<KbHostState>) -> bool {
        let mut rt = self.runtime();
        if let Some(state) = host {
            self.host.set(state.into());
            if !rt.has_host() {
                let adapter: Arc<dyn HostControllerAdapter> = self.host.clone();
                rt.set_host(Some(adapter));
            }
        }
        match rt.handle_lifecycle(event.into()) {
            SyncOutcome::Synced { changed, .. } => changed.any(),
            SyncOutcome::NotDue => false,
        }
    }

    /// Run one main-queue turn. Call once per host refresh cycle.
    fn run_pending(&self) -> u32 {
        u32::try_from(self.runtime().run_pending()).unwrap_or(u32::MAX)
    }

    fn pending_jobs(&self) -> u32 {
        u32::try_from(self.runtime().pending_jobs()).unwrap_or(u32::MAX)
    }

    fn take_changes(&self) -> Vec<KbContextChange> {
        self.runtime()
            .take_changes()
            .into_iter()
            .map(KbContextChange::from)
            .collect()
    }

    fn snapshot(&self) -> KbContextSnapshot {
        self.runtime().snapshot().into()
    }

    // --- Locale ---

    fn locale_identifier(&self) -> String {
        self.runtime().context().locale_identifier().to_string()
    }

    fn set_locale_identifier(&self, identifier: String) {
        self.runtime().context_mut().set_locale_identifier(&identifier);
    }

    fn set_locales(&self, identifiers: Vec<String>) {
        let locales = identifiers.iter().map(|id| Locale::new(id)).collect();
        self.runtime().context_mut().set_locales(locales);
    }

    fn next_locale(&self) -> Option<String> {
        self.runtime()
            .context()
            .next_locale()
            .map(|l| l.identifier().to_string())
    }

    /// Select the next locale and return the new current identifier.
    fn select_next_locale(&self) -> String {
        let mut rt = self.runtime();
        rt.context_mut().select_next_locale();
        rt.context().locale_identifier().to_string()
    }

    fn has_current_locale(&self, identifier: String) -> bool {
        self.runtime()
            .context()
            .has_current_locale(&Locale::new(&identifier))
    }

    // --- Keyboard type and toggles ---

    fn keyboard_type(&self) -> KbKeyboardType {
        self.runtime().context().keyboard_type().clone().into()
    }

    fn set_keyboard_type(&self, keyboard_type: KbKeyboardType) {
        self.runtime()
            .context_mut()
            .set_keyboard_type(keyboard_type.into());
    }

    fn has_keyboard_type(&self, keyboard_type: KbKeyboardType) -> bool {
        self.runtime()
            .context()
            .has_keyboard_type(&keyboard_type.into())
    }

    fn set_prefers_autocomplete(&self, value: bool) {
        self.runtime().context_mut().set_prefers_autocomplete(value);
    }

    fn set_is_autocapitalization_enabled(&self, value: bool) {
        self.runtime()
            .context_mut()
            .set_is_autocapitalization_enabled(value);
    }

    fn set_keyboard_dictation_replacement(&self, value: Option<String>) {
        self.runtime()
            .context_mut()
            .set_keyboard_dictation_replacement(value);
    }

    fn set_text_input_proxy(&self, proxy: Option<u64>) {
        self.runtime()
            .context_mut()
            .set_text_input_proxy(proxy.map(keyctx_core::ProxyHandle));
    }

    // --- Settings ---

    fn autocomplete(&self) -> KbAutocomplete {
        self.runtime().autocomplete().values().into()
    }

    /// Write settings from inside the keyboard. They reach the autocomplete
    /// context on the next lifecycle call or [`KbKeyboard::sync_settings`].
    fn update_settings(&self, values: KbAutocomplete) -> Result<(), KbError> {
        check_display_count(values.suggestions_display_count)?;
        let mut rt = self.runtime();
        let settings = rt.settings_mut();
        let current = settings.values();
        if current.is_autocomplete_enabled != values.is_autocomplete_enabled {
            settings.set_is_autocomplete_enabled(values.is_autocomplete_enabled)?;
        }
        if current.is_autocorrect_enabled != values.is_autocorrect_enabled {
            settings.set_is_autocorrect_enabled(values.is_autocorrect_enabled)?;
        }
        if current.suggestions_display_count != values.suggestions_display_count {
            settings.set_suggestions_display_count(values.suggestions_display_count)?;
        }
        Ok(())
    }

    /// Pick up edits from the containing app and propagate settings if due.
    /// Returns true if any value changed.
    fn sync_settings(&self) -> bool {
        match self.runtime().maybe_sync_settings() {
            SyncOutcome::Synced { changed, .. } => changed.any(),
            SyncOutcome::NotDue => false,
        }
    }
}

/// Identifiers of every locale with a dedicated keyboard layout.
#[uniffi::export]
fn keyboard_locales() -> Vec<String> {
    KeyboardLocale::ALL
        .iter()
        .map(|l| l.id().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::settings::KbSettings;
    use crate::api::types::{KbAppearance, KbColorScheme, KbKeyboardCase, KbSize};

    fn host() -> KbHostState {
        KbHostState {
            has_dictation_key: false,
            has_full_access: true,
            primary_language: Some("en".into()),
            screen_size: KbSize {
                width: 320.0,
                height: 480.0,
            },
            text_input_mode: None,
            needs_input_mode_switch_key: true,
            keyboard_appearance: KbAppearance::Light,
            color_scheme: KbColorScheme::Light,
            text_document_proxy: Some(3),
        }
    }

    #[test]
    fn lifecycle_mirrors_host_then_deferred_fields() {
        let kb = KbKeyboard::in_memory();
        kb.handle_lifecycle(KbLifecycleEvent::ViewWillAppear, Some(host()));
        let snap = kb.snapshot();
        assert!(snap.has_full_access);
        assert_eq!(snap.primary_language.as_deref(), Some("en"));
        assert!(!snap.needs_input_mode_switch_key);

        assert_eq!(kb.run_pending(), 1);
        let snap = kb.snapshot();
        assert!(snap.needs_input_mode_switch_key);
        assert_eq!(snap.text_document_proxy, Some(3));
        assert_eq!(kb.pending_jobs(), 0);
    }

    #[test]
    fn lifecycle_without_host_keeps_defaults() {
        let kb = KbKeyboard::in_memory();
        kb.handle_lifecycle(KbLifecycleEvent::Initialized, None);
        assert_eq!(kb.pending_jobs(), 0);
        assert!(!kb.snapshot().has_full_access);
    }

    #[test]
    fn locale_cycling_reports_changes() {
        let kb = KbKeyboard::in_memory();
        kb.set_locales(vec!["en".into(), "fi".into(), "da".into()]);
        kb.set_locale_identifier("fi".into());
        kb.take_changes();

        assert_eq!(kb.next_locale().as_deref(), Some("da"));
        assert_eq!(kb.select_next_locale(), "da");
        assert!(kb.has_current_locale("da".into()));
        assert_eq!(
            kb.take_changes(),
            vec![KbContextChange::Locale {
                identifier: "da".into()
            }]
        );
    }

    #[test]
    fn keyboard_type_round_trips_through_ffi_enum() {
        let kb = KbKeyboard::in_memory();
        let upper = KbKeyboardType::Alphabetic {
            keyboard_case: KbKeyboardCase::Uppercased,
        };
        kb.set_keyboard_type(upper.clone());
        assert_eq!(kb.keyboard_type(), upper);
        assert!(kb.has_keyboard_type(upper));
        assert!(!kb.has_keyboard_type(KbKeyboardType::Numeric));
    }

    #[test]
    fn settings_edits_reach_autocomplete_on_sync() {
        let kb = KbKeyboard::in_memory();
        kb.handle_lifecycle(KbLifecycleEvent::Initialized, None);
        let mut values = kb.autocomplete();
        values.suggestions_display_count = 5;
        values.is_autocorrect_enabled = false;
        kb.update_settings(values).unwrap();
        assert!(kb.sync_settings());
        assert_eq!(kb.autocomplete(), values);
        assert!(!kb.sync_settings());
    }

    #[test]
    fn zero_display_count_is_rejected_from_keyboard() {
        let kb = KbKeyboard::in_memory();
        kb.handle_lifecycle(KbLifecycleEvent::Initialized, None);
        let before = kb.autocomplete();
        let mut values = before;
        values.suggestions_display_count = 0;
        values.is_autocorrect_enabled = !before.is_autocorrect_enabled;
        assert!(matches!(
            kb.update_settings(values),
            Err(KbError::InvalidData { .. })
        ));
        kb.sync_settings();
        assert_eq!(kb.autocomplete(), before);
    }

    #[test]
    fn app_edits_reach_keyboard_on_next_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().into_owned();
        let kb = KbKeyboard::open(path.clone());
        kb.handle_lifecycle(KbLifecycleEvent::Initialized, None);

        let app = KbSettings::open(path);
        app.set_suggestions_display_count(4).unwrap();
        assert_ne!(kb.autocomplete().suggestions_display_count, 4);

        assert!(kb.handle_lifecycle(KbLifecycleEvent::ViewWillAppear, None));
        assert_eq!(kb.autocomplete().suggestions_display_count, 4);
        assert_eq!(app.values().suggestions_display_count, 4);
    }

    #[test]
    fn sync_settings_picks_up_app_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().into_owned();
        let kb = KbKeyboard::open(path.clone());
        kb.handle_lifecycle(KbLifecycleEvent::Initialized, None);
        assert!(!kb.sync_settings());

        KbSettings::open(path)
            .set_suggestions_display_count(4)
            .unwrap();
        assert!(kb.sync_settings());
        assert_eq!(kb.autocomplete().suggestions_display_count, 4);
        assert!(!kb.sync_settings());
    }

    #[test]
    fn open_persists_locale_in_store_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().into_owned();
        KbKeyboard::open(path.clone()).set_locale_identifier("da".into());
        assert_eq!(KbKeyboard::open(path).locale_identifier(), "da");
    }

    #[test]
    fn keyboard_locales_lists_layouts() {
        let ids = keyboard_locales();
        assert!(ids.contains(&"da".to_string()));
        assert!(ids.contains(&"en_GB".to_string()));
    }
}
