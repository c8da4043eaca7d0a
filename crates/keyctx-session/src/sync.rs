//! One-way propagation of stored settings into the autocomplete context.
//!
//! Data only flows store → context. The context never writes settings back,
//! so a propagated value cannot bounce and re-trigger a sync.

use keyctx_core::clock::Timestamp;
use tracing::{debug, trace, warn};

use crate::autocomplete::AutocompleteContext;
use crate::settings::SettingsSnapshot;

/// Which context fields a sync actually wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangedFields {
    pub suggestions_display_count: bool,
    pub is_autocomplete_enabled: bool,
    pub is_autocorrect_enabled: bool,
}

impl ChangedFields {
    pub fn any(&self) -> bool {
        self.suggestions_display_count
            || self.is_autocomplete_enabled
            || self.is_autocorrect_enabled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// `last_synced_at >= last_changed_at`; nothing was read or written.
    NotDue,
    Synced {
        changed: ChangedFields,
        /// `None` if persisting `lastSynced` failed; the next call retries.
        synced_at: Option<Timestamp>,
    },
}

/// Copy the settings into `context` if the snapshot changed since the last sync.
///
/// Each field is written only if it differs from the context's value.
/// `lastSynced` advances whenever a sync runs, even if no field differed.
pub fn maybe_sync(
    snapshot: &mut SettingsSnapshot,
    context: &mut AutocompleteContext,
) -> SyncOutcome {
    if !snapshot.is_sync_due() {
        trace!("settings sync not due");
        return SyncOutcome::NotDue;
    }

    let values = snapshot.values();
    let mut changed = ChangedFields::default();
    if context.suggestions_display_count() != values.suggestions_display_count {
        context.set_suggestions_display_count(values.suggestions_display_count);
        changed.suggestions_display_count = true;
    }
    if context.is_autocomplete_enabled() != values.is_autocomplete_enabled {
        context.set_is_autocomplete_enabled(values.is_autocomplete_enabled);
        changed.is_autocomplete_enabled = true;
    }
    if context.is_autocorrect_enabled() != values.is_autocorrect_enabled {
        context.set_is_autocorrect_enabled(values.is_autocorrect_enabled);
        changed.is_autocorrect_enabled = true;
    }

    let synced_at = match snapshot.mark_synced(values) {
        Ok(at) => Some(at),
        Err(e) => {
            warn!(error = %e, "failed to persist lastSynced");
            None
        }
    };
    debug!(?changed, "settings synced");
    SyncOutcome::Synced { changed, synced_at }
}

/// Owns the settings snapshot and drives [`maybe_sync`] from lifecycle hooks.
#[derive(Debug)]
pub struct SettingsSyncBridge {
    snapshot: SettingsSnapshot,
}

impl SettingsSyncBridge {
    pub fn new(snapshot: SettingsSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &SettingsSnapshot {
        &self.snapshot
    }

    pub fn snapshot_mut(&mut self) -> &mut SettingsSnapshot {
        &mut self.snapshot
    }

    pub fn maybe_sync(&mut self, context: &mut AutocompleteContext) -> SyncOutcome {
        maybe_sync(&mut self.snapshot, context)
    }

    /// Pick up out-of-process edits, then sync if due.
    pub fn reload_and_sync(&mut self, context: &mut AutocompleteContext) -> SyncOutcome {
        self.snapshot.reload();
        maybe_sync(&mut self.snapshot, context)
    }
}
