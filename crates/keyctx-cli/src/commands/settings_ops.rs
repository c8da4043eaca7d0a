use std::path::Path;
use std::process;
use std::sync::Arc;

use keyctx_core::store::FileStore;
use keyctx_session::{KeyboardRuntime, LifecycleEvent, SettingsSnapshot, SyncOutcome};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, Default)]
pub struct SettingsEdit {
    pub autocomplete: Option<bool>,
    pub autocorrect: Option<bool>,
    pub count: Option<u32>,
}

pub fn settings_show(dir: &Path) {
    let snapshot = SettingsSnapshot::new(Arc::new(FileStore::in_dir(dir)));
    let v = snapshot.values();
    println!("isAutocompleteEnabled\t{}", v.is_autocomplete_enabled);
    println!("isAutocorrectEnabled\t{}", v.is_autocorrect_enabled);
    println!("suggestionsDisplayCount\t{}", v.suggestions_display_count);
    println!("lastSynced\t{}", snapshot.last_synced_at().datetime());
}

/// Write settings as the containing app would.
pub fn settings_set(dir: &Path, edit: &SettingsEdit) {
    if edit.count == Some(0) {
        eprintln!("Error: --count must be positive");
        process::exit(1);
    }
    let mut snapshot = SettingsSnapshot::new(Arc::new(FileStore::in_dir(dir)));
    if let Some(v) = edit.autocomplete {
        die!(snapshot.set_is_autocomplete_enabled(v), "Error: {}");
    }
    if let Some(v) = edit.autocorrect {
        die!(snapshot.set_is_autocorrect_enabled(v), "Error: {}");
    }
    if let Some(v) = edit.count {
        die!(snapshot.set_suggestions_display_count(v), "Error: {}");
    }
    println!("{:?}", snapshot.values());
}

/// Run one keyboard launch against the store and print the resulting context.
pub fn sync(dir: &Path) {
    let mut rt = KeyboardRuntime::new(Arc::new(FileStore::in_dir(dir)));
    match rt.handle_lifecycle(LifecycleEvent::Initialized) {
        SyncOutcome::NotDue => eprintln!("sync: not due"),
        SyncOutcome::Synced { changed, synced_at } => {
            eprintln!("sync: changed={changed:?} synced_at={synced_at:?}")
        }
    }
    let json = die!(serde_json::to_string_pretty(&rt.snapshot()), "Error: {}");
    println!("{json}");
}
