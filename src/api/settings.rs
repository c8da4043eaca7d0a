use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use keyctx_core::store::FileStore;
use keyctx_session::SettingsSnapshot;

use super::types::{KbAutocomplete, KbError};

/// Settings access for the containing app, sharing the keyboard's store.
#[derive(uniffi::Object)]
pub struct KbSettings {
    inner: Mutex<SettingsSnapshot>,
}

/// Rejects display counts the keyboard could not lay out.
pub(crate) fn check_display_count(value: u32) -> Result<(), KbError> {
    if value == 0 {
        return Err(KbError::InvalidData {
            msg: "suggestions_display_count must be positive".to_string(),
        });
    }
    Ok(())
}

impl KbSettings {
    fn inner(&self) -> MutexGuard<'_, SettingsSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[uniffi::export]
impl KbSettings {
    #[uniffi::constructor]
    pub(crate) fn open(store_dir: String) -> Arc<Self> {
        let store = Arc::new(FileStore::in_dir(Path::new(&store_dir)));
        Arc::new(Self {
            inner: Mutex::new(SettingsSnapshot::new(store)),
        })
    }

    pub(crate) fn values(&self) -> KbAutocomplete {
        self.inner().values().into()
    }

    fn set_is_autocomplete_enabled(&self, value: bool) -> Result<(), KbError> {
        Ok(self.inner().set_is_autocomplete_enabled(value)?)
    }

    fn set_is_autocorrect_enabled(&self, value: bool) -> Result<(), KbError> {
        Ok(self.inner().set_is_autocorrect_enabled(value)?)
    }

    pub(crate) fn set_suggestions_display_count(&self, value: u32) -> Result<(), KbError> {
        check_display_count(value)?;
        Ok(self.inner().set_suggestions_display_count(value)?)
    }

    /// Unix seconds of the last propagation into a keyboard.
    fn last_synced_at(&self) -> i64 {
        self.inner().last_synced_at().unix_secs()
    }
}
