use keyctx_core::Locale;
use keyctx_session::KeyboardContext;

/// The locale `steps` selections after `current` within `locales`.
pub fn cycle_locales(locales: &[String], current: &str, steps: usize) -> Vec<String> {
    let mut context = KeyboardContext::with_locale(Locale::new(current));
    context.set_locales(locales.iter().map(|id| Locale::new(id)).collect());
    (0..steps)
        .map(|_| {
            context.select_next_locale();
            context.locale_identifier().to_string()
        })
        .collect()
}

pub fn cycle(locales: &[String], current: &str, steps: usize) {
    for id in cycle_locales(locales, current, steps) {
        println!("{id}");
    }
}
