mod cycling;
mod proptest_state;

use std::sync::{Arc, Mutex};

use keyctx_core::clock::{ManualClock, Timestamp};
use keyctx_core::store::{MemoryStore, SettingsStore, StoreError};
use keyctx_core::{Locale, Observable, Size};
use serde_json::Value;

use crate::host::{HostState, HostTraits};
use crate::settings::SettingsSnapshot;

pub(super) const START: i64 = 1_700_000_000;

pub(super) fn locale(id: &str) -> Locale {
    Locale::new(id)
}

pub(super) fn locales(ids: &[&str]) -> Vec<Locale> {
    ids.iter().map(|id| Locale::new(id)).collect()
}

pub(super) fn manual_clock() -> ManualClock {
    ManualClock::new(Timestamp::from_unix_secs(START))
}

pub(super) fn snapshot_with(store: &MemoryStore, clock: &ManualClock) -> SettingsSnapshot {
    SettingsSnapshot::with_clock(Arc::new(store.clone()), Arc::new(clock.clone()))
}

pub(super) fn host_state() -> HostState {
    HostState {
        has_dictation_key: true,
        has_full_access: true,
        primary_language: Some("en".to_string()),
        screen_size: Size::new(320.0, 480.0),
        text_input_mode: None,
        traits: HostTraits::default(),
        needs_input_mode_switch_key: true,
        text_document_proxy: None,
    }
}

/// Record every notification of `observable`.
pub(super) fn watch<T>(observable: &Observable<T>) -> Arc<Mutex<Vec<T>>>
where
    T: PartialEq + Clone + Send + 'static,
{
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    observable.subscribe(move |v: &T| sink.lock().unwrap().push(v.clone()));
    seen
}

/// Bounded-retry check for state that converges after deferred work.
///
/// Runs `turn` then `check` up to `attempts` times and panics if `check`
/// never passes.
pub(super) fn eventually<S>(
    state: &mut S,
    attempts: usize,
    mut turn: impl FnMut(&mut S),
    mut check: impl FnMut(&S) -> bool,
) {
    for _ in 0..attempts {
        if check(state) {
            return;
        }
        turn(state);
    }
    assert!(check(state), "condition not met within {attempts} turns");
}

/// Store whose writes always fail.
pub(super) struct ReadOnlyStore(pub MemoryStore);

impl SettingsStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.0.get(key)
    }

    fn set(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.0.keys()
    }
}
