use super::{locale, locales, watch};
use crate::KeyboardContext;

fn context_with(current: &str, ids: &[&str]) -> KeyboardContext {
    let mut context = KeyboardContext::with_locale(locale(current));
    context.set_locales(locales(ids));
    context
}

#[test]
fn test_selects_first_item_if_current_locale_is_not_in_locales() {
    let mut context = context_with("sv", &["en", "fi", "da"]);
    context.select_next_locale();
    assert_eq!(context.locale().identifier(), "en");
}

#[test]
fn test_selects_first_item_if_current_locale_is_last() {
    let mut context = context_with("sv", &["en", "fi", "da"]);
    context.set_locale(locale("da"));
    context.select_next_locale();
    assert_eq!(context.locale().identifier(), "en");
}

#[test]
fn test_selects_next_item_if_current_locale_is_not_last() {
    let mut context = context_with("sv", &["en", "fi", "da"]);
    context.set_locale(locale("fi"));
    context.select_next_locale();
    assert_eq!(context.locale().identifier(), "da");
}

#[test]
fn test_empty_locales_is_noop() {
    let mut context = context_with("sv", &[]);
    let seen = watch(context.observe_locale());
    context.select_next_locale();
    assert_eq!(context.locale().identifier(), "sv");
    assert!(context.next_locale().is_none());
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(context.observe_locale().writes(), 0);
}

#[test]
fn test_single_locale_selects_itself() {
    let mut context = context_with("fi", &["fi"]);
    context.select_next_locale();
    assert_eq!(context.locale().identifier(), "fi");
}

#[test]
fn test_full_cycle_returns_to_start() {
    let mut context = context_with("en", &["en", "fi", "da"]);
    let mut visited = Vec::new();
    for _ in 0..3 {
        context.select_next_locale();
        visited.push(context.locale_identifier().to_string());
    }
    assert_eq!(visited, vec!["fi", "da", "en"]);
}

#[test]
fn test_duplicates_are_not_skipped() {
    // The first match decides the position, so a duplicate of the current
    // locale right after it is selected as-is.
    let mut context = context_with("en", &["en", "en", "fi"]);
    context.select_next_locale();
    assert_eq!(context.locale().identifier(), "en");
    assert_eq!(context.next_locale().map(|l| l.identifier()), Some("en"));
}

#[test]
fn test_cycling_never_mutates_locales() {
    let mut context = context_with("sv", &["en", "fi", "da"]);
    let before = context.locales().clone();
    for _ in 0..5 {
        context.select_next_locale();
    }
    assert_eq!(*context.locales(), before);
    assert_eq!(context.observe_locales().writes(), 1);
}

#[test]
fn test_cycling_matches_normalized_identifiers() {
    let mut context = context_with("EN-gb", &["en-GB", "fi"]);
    context.select_next_locale();
    assert_eq!(context.locale().identifier(), "fi");
}
