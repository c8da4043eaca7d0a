//! Store-backed autocomplete settings, possibly edited by another process.

use std::sync::Arc;

use keyctx_core::clock::{Clock, SystemClock, Timestamp};
use keyctx_core::config::config;
use keyctx_core::store::{SettingsStore, SettingsStoreExt, StorageValue, StoreError};
use tracing::debug;

use crate::autocomplete::AutocompleteValues;

pub const AUTOCOMPLETE_DOMAIN: &str = "autocomplete";

#[derive(Debug, Clone)]
pub struct SettingsKeys {
    pub is_autocomplete_enabled: String,
    pub is_autocorrect_enabled: String,
    pub suggestions_display_count: String,
    pub last_synced: String,
}

impl SettingsKeys {
    pub fn new() -> Self {
        let c = config();
        Self {
            is_autocomplete_enabled: c.store_key(AUTOCOMPLETE_DOMAIN, "isAutocompleteEnabled"),
            is_autocorrect_enabled: c.store_key(AUTOCOMPLETE_DOMAIN, "isAutocorrectEnabled"),
            suggestions_display_count: c.store_key(AUTOCOMPLETE_DOMAIN, "suggestionsDisplayCount"),
            last_synced: c.store_key(AUTOCOMPLETE_DOMAIN, "lastSynced"),
        }
    }
}

impl Default for SettingsKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// The persisted settings record plus this process's view of its freshness.
///
/// `last_changed_at` lives in memory: it starts at construction time and is
/// touched by every setter and by [`SettingsSnapshot::reload`] when the store
/// drifted. `last_synced_at` is persisted and written only by the sync bridge.
pub struct SettingsSnapshot {
    store: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    keys: SettingsKeys,
    last_changed: Timestamp,
    default_last_synced: Timestamp,
    last_seen: AutocompleteValues,
}

impl SettingsSnapshot {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let staleness = i64::try_from(config().sync.initial_staleness_secs).unwrap_or(i64::MAX);
        let mut snapshot = Self {
            store,
            clock,
            keys: SettingsKeys::new(),
            last_changed: now,
            default_last_synced: now.saturating_sub_secs(staleness),
            last_seen: AutocompleteValues::default(),
        };
        snapshot.last_seen = snapshot.values();
        snapshot
    }

    pub fn keys(&self) -> &SettingsKeys {
        &self.keys
    }

    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    pub fn is_autocomplete_enabled(&self) -> bool {
        self.store
            .get_value(&self.keys.is_autocomplete_enabled)
            .unwrap_or(config().autocomplete.is_autocomplete_enabled)
    }

    pub fn is_autocorrect_enabled(&self) -> bool {
        self.store
            .get_value(&self.keys.is_autocorrect_enabled)
            .unwrap_or(config().autocomplete.is_autocorrect_enabled)
    }

    pub fn suggestions_display_count(&self) -> u32 {
        self.store
            .get_value(&self.keys.suggestions_display_count)
            .unwrap_or(config().autocomplete.suggestions_display_count)
    }

    pub fn values(&self) -> AutocompleteValues {
        AutocompleteValues {
            is_autocomplete_enabled: self.is_autocomplete_enabled(),
            is_autocorrect_enabled: self.is_autocorrect_enabled(),
            suggestions_display_count: self.suggestions_display_count(),
        }
    }

    pub fn set_is_autocomplete_enabled(&mut self, value: bool) -> Result<(), StoreError> {
        self.store
            .set_value(&self.keys.is_autocomplete_enabled, &value)?;
        self.last_seen.is_autocomplete_enabled = value;
        self.touch();
        Ok(())
    }

    pub fn set_is_autocorrect_enabled(&mut self, value: bool) -> Result<(), StoreError> {
        self.store
            .set_value(&self.keys.is_autocorrect_enabled, &value)?;
        self.last_seen.is_autocorrect_enabled = value;
        self.touch();
        Ok(())
    }

    pub fn set_suggestions_display_count(&mut self, value: u32) -> Result<(), StoreError> {
        self.store
            .set_value(&self.keys.suggestions_display_count, &value)?;
        self.last_seen.suggestions_display_count = value;
        self.touch();
        Ok(())
    }

    pub fn last_changed_at(&self) -> Timestamp {
        self.last_changed
    }

    pub fn last_synced_at(&self) -> Timestamp {
        self.store
            .get_value::<StorageValue<Timestamp>>(&self.keys.last_synced)
            .map(|v| v.value)
            .unwrap_or(self.default_last_synced)
    }

    /// The freshness predicate: `last_synced_at < last_changed_at`.
    pub fn is_sync_due(&self) -> bool {
        self.last_synced_at() < self.last_changed_at()
    }

    /// Re-read the store and touch `last_changed_at` if another process
    /// changed any value since this process last saw it.
    pub fn reload(&mut self) -> bool {
        let current = self.values();
        if current == self.last_seen {
            return false;
        }
        debug!(?current, previous = ?self.last_seen, "settings changed out of process");
        self.last_seen = current;
        self.touch();
        true
    }

    /// Record `values` as propagated and persist the sync time, which is
    /// never earlier than `last_changed_at`.
    pub(crate) fn mark_synced(
        &mut self,
        values: AutocompleteValues,
    ) -> Result<Timestamp, StoreError> {
        self.last_seen = values;
        let at = self.clock.now().max(self.last_changed);
        self.store
            .set_value(&self.keys.last_synced, &StorageValue::new(at))?;
        Ok(at)
    }

    /// A change must land strictly after the last sync, even when the clock
    /// has not moved since, or the freshness predicate would miss it.
    fn touch(&mut self) {
        let now = self.clock.now();
        let synced = self.last_synced_at();
        self.last_changed = if now > synced { now } else { synced.next() };
    }
}

impl std::fmt::Debug for SettingsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsSnapshot")
            .field("keys", &self.keys)
            .field("last_changed", &self.last_changed)
            .field("last_seen", &self.last_seen)
            .finish_non_exhaustive()
    }
}
