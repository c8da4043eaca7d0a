//! Property-based tests for the runtime state.
//!
//! Random interleavings of user edits, out-of-process settings edits, host
//! syncs and lifecycle events, with invariants checked after every step.

use std::sync::Arc;

use keyctx_core::clock::{Clock, ManualClock};
use keyctx_core::store::{MemoryStore, SettingsStore};
use keyctx_core::{Locale, Size};
use proptest::prelude::*;

use super::manual_clock;
use crate::{
    ContextChange, HostControllerAdapter, HostState, KeyboardRuntime, LifecycleEvent,
    SettingsSnapshot, StaticHost, SyncOutcome,
};

const POOL: &[&str] = &["en", "fi", "da", "sv", "de", "en_GB"];

#[derive(Debug, Clone)]
enum Action {
    SelectNext,
    SetLocale(usize),
    SetLocales(Vec<usize>),
    /// Edit made by this process through its own snapshot.
    EditCount(u32),
    EditAutocomplete(bool),
    EditAutocorrect(bool),
    /// Edit made by the host app through a second snapshot on the same store.
    AppEditCount(u32),
    AppEditAutocorrect(bool),
    Advance(i64),
    PushHost { full_access: bool, width: u8 },
    Lifecycle,
    Sync,
    RunTurn,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        10 => Just(Action::SelectNext),
        4 => (0..POOL.len()).prop_map(Action::SetLocale),
        3 => prop::collection::vec(0..POOL.len(), 0..5).prop_map(Action::SetLocales),
        4 => (1u32..8).prop_map(Action::EditCount),
        2 => any::<bool>().prop_map(Action::EditAutocomplete),
        2 => any::<bool>().prop_map(Action::EditAutocorrect),
        4 => (1u32..8).prop_map(Action::AppEditCount),
        3 => any::<bool>().prop_map(Action::AppEditAutocorrect),
        5 => (0i64..3).prop_map(Action::Advance),
        4 => (any::<bool>(), any::<u8>())
            .prop_map(|(full_access, width)| Action::PushHost { full_access, width }),
        8 => Just(Action::Lifecycle),
        5 => Just(Action::Sync),
        5 => Just(Action::RunTurn),
    ]
}

struct Harness {
    rt: KeyboardRuntime,
    app: SettingsSnapshot,
    host: Arc<StaticHost>,
    clock: ManualClock,
}

impl Harness {
    fn new() -> Self {
        let store = MemoryStore::new();
        let clock = manual_clock();
        let host = Arc::new(StaticHost::default());
        let clock_dyn: Arc<dyn Clock> = Arc::new(clock.clone());
        let rt = KeyboardRuntime::with_clock(Arc::new(store.clone()), Arc::clone(&clock_dyn))
            .with_host(host.clone());
        let app =
            SettingsSnapshot::with_clock(Arc::new(store) as Arc<dyn SettingsStore>, clock_dyn);
        Self {
            rt,
            app,
            host,
            clock,
        }
    }

    fn execute(&mut self, action: &Action) {
        match action {
            Action::SelectNext => {
                let before = self.rt.context().locales().clone();
                let current = self.rt.context().locale().clone();
                self.rt.context_mut().select_next_locale();
                let c = self.rt.context();
                assert_eq!(*c.locales(), before, "cycling mutated locales");
                if before.is_empty() {
                    assert_eq!(*c.locale(), current);
                } else {
                    assert!(before.contains(c.locale()));
                }
            }
            Action::SetLocale(i) => self.rt.context_mut().set_locale_identifier(POOL[*i]),
            Action::SetLocales(ids) => {
                let locales = ids.iter().map(|i| Locale::new(POOL[*i])).collect();
                self.rt.context_mut().set_locales(locales);
            }
            Action::EditCount(n) => {
                self.rt.settings_mut().set_suggestions_display_count(*n).unwrap()
            }
            Action::EditAutocomplete(b) => {
                self.rt.settings_mut().set_is_autocomplete_enabled(*b).unwrap()
            }
            Action::EditAutocorrect(b) => {
                self.rt.settings_mut().set_is_autocorrect_enabled(*b).unwrap()
            }
            Action::AppEditCount(n) => self.app.set_suggestions_display_count(*n).unwrap(),
            Action::AppEditAutocorrect(b) => self.app.set_is_autocorrect_enabled(*b).unwrap(),
            Action::Advance(secs) => self.clock.advance_secs(*secs),
            Action::PushHost { full_access, width } => self.host.set(HostState {
                has_full_access: *full_access,
                screen_size: Size::new(f64::from(*width), 480.0),
                ..HostState::default()
            }),
            Action::Lifecycle => {
                self.rt.handle_lifecycle(LifecycleEvent::ViewWillAppear);
                let host = self.host.snapshot();
                let c = self.rt.context();
                assert_eq!(*c.has_full_access(), host.has_full_access);
                assert_eq!(*c.screen_size(), host.screen_size);
                assert_eq!(
                    self.rt.autocomplete().values(),
                    self.rt.settings().values(),
                    "lifecycle sync did not converge"
                );
                assert!(!self.rt.settings().is_sync_due());
            }
            Action::Sync => {
                let due = self.rt.settings().is_sync_due();
                let outcome = self.rt.maybe_sync_settings();
                if due {
                    assert_ne!(outcome, SyncOutcome::NotDue);
                }
                assert_eq!(
                    self.rt.autocomplete().values(),
                    self.rt.settings().values(),
                    "explicit sync did not converge"
                );
                let writes = self.rt.autocomplete().writes();
                assert_eq!(self.rt.maybe_sync_settings(), SyncOutcome::NotDue);
                assert_eq!(self.rt.autocomplete().writes(), writes);
            }
            Action::RunTurn => {
                self.rt.run_pending();
            }
        }
    }

    fn assert_invariants(&self) {
        let c = self.rt.context();
        assert_eq!(c.locale_identifier(), c.locale().identifier());
        assert!(c.has_current_locale(c.locale()));
    }
}

/// Consecutive notifications for the same field must carry different values.
fn assert_no_duplicate_notifications(changes: &[ContextChange]) {
    let locales: Vec<&Locale> = changes
        .iter()
        .filter_map(|c| match c {
            ContextChange::Locale(l) => Some(l),
            _ => None,
        })
        .collect();
    for pair in locales.windows(2) {
        assert_ne!(pair[0], pair[1], "locale listener fired without a change");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn runtime_invariants_hold(actions in prop::collection::vec(arb_action(), 1..80)) {
        let mut h = Harness::new();
        let mut changes = Vec::new();
        for action in &actions {
            h.execute(action);
            h.assert_invariants();
            changes.extend(h.rt.take_changes());
        }
        assert_no_duplicate_notifications(&changes);

        // Quiescence: one more lifecycle event converges everything.
        h.execute(&Action::Lifecycle);
        h.rt.run_until_idle();
        prop_assert_eq!(h.rt.pending_jobs(), 0);
        prop_assert_eq!(h.rt.autocomplete().values(), h.rt.settings().values());
    }

    #[test]
    fn cycling_through_all_locales_returns_to_start(
        ids in prop::collection::vec(0..POOL.len(), 1..6),
        start in 0..POOL.len(),
    ) {
        let mut h = Harness::new();
        let locales: Vec<Locale> = ids.iter().map(|i| Locale::new(POOL[*i])).collect();
        h.rt.context_mut().set_locales(locales.clone());
        h.rt.context_mut().set_locale_identifier(POOL[start]);
        h.rt.context_mut().select_next_locale();
        let first = h.rt.context().locale().clone();
        prop_assert!(locales.contains(&first));
        // Once inside the list, stepping never leaves it.
        for _ in 0..locales.len() * 2 {
            h.rt.context_mut().select_next_locale();
            prop_assert!(locales.contains(h.rt.context().locale()));
        }
    }
}
