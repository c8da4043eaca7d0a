use keyctx_core::{
    ColorScheme, DeviceType, KeyboardAppearance, KeyboardLocale, KeyboardType, Locale, Observable,
    ProxyHandle, Size, TextInputMode,
};
use tracing::{debug, trace};

use crate::host::{DeferredHostFields, HostState};
use crate::queue::MainQueue;

const HOST_SLOT: &str = "host";

/// Generates a value getter and an `observe_*` accessor per observable field.
macro_rules! observable_accessors {
    ($($field:ident / $observe:ident : $ty:ty),* $(,)?) => {
        $(
            pub fn $field(&self) -> &$ty {
                self.$field.get()
            }

            pub fn $observe(&self) -> &Observable<$ty> {
                &self.$field
            }
        )*
    };
}

/// Live keyboard state read by every other keyboard subsystem.
///
/// Locale, keyboard type and the user toggles are settable by anyone.
/// The capability mirror (dictation key, full access, screen size, ...) is
/// written only by [`KeyboardContext::sync_with_host`].
#[derive(Debug)]
pub struct KeyboardContext {
    locale: Observable<Locale>,
    locales: Observable<Vec<Locale>>,
    keyboard_type: Observable<KeyboardType>,
    prefers_autocomplete: Observable<bool>,
    keyboard_dictation_replacement: Observable<Option<String>>,
    is_autocapitalization_enabled: Observable<bool>,
    text_input_proxy: Observable<Option<ProxyHandle>>,

    // Host mirror
    device_type: Observable<DeviceType>,
    screen_size: Observable<Size>,
    has_dictation_key: Observable<bool>,
    has_full_access: Observable<bool>,
    primary_language: Observable<Option<String>>,
    needs_input_mode_switch_key: Observable<bool>,
    text_input_mode: Observable<Option<TextInputMode>>,
    keyboard_appearance: Observable<KeyboardAppearance>,
    color_scheme: Observable<ColorScheme>,
    original_text_document_proxy: Observable<Option<ProxyHandle>>,
}

impl KeyboardContext {
    pub fn new() -> Self {
        Self::with_locale(Locale::current())
    }

    /// A context whose current locale, and only cycling entry, is `locale`.
    pub fn with_locale(locale: Locale) -> Self {
        Self {
            locales: Observable::new(vec![locale.clone()]),
            locale: Observable::new(locale),
            keyboard_type: Observable::new(KeyboardType::default()),
            prefers_autocomplete: Observable::new(true),
            keyboard_dictation_replacement: Observable::new(None),
            is_autocapitalization_enabled: Observable::new(true),
            text_input_proxy: Observable::new(None),
            device_type: Observable::new(DeviceType::current()),
            screen_size: Observable::new(Size::ZERO),
            has_dictation_key: Observable::new(false),
            has_full_access: Observable::new(false),
            primary_language: Observable::new(None),
            needs_input_mode_switch_key: Observable::new(false),
            text_input_mode: Observable::new(None),
            keyboard_appearance: Observable::new(KeyboardAppearance::default()),
            color_scheme: Observable::new(ColorScheme::default()),
            original_text_document_proxy: Observable::new(None),
        }
    }

    observable_accessors! {
        locale / observe_locale: Locale,
        locales / observe_locales: Vec<Locale>,
        keyboard_type / observe_keyboard_type: KeyboardType,
        prefers_autocomplete / observe_prefers_autocomplete: bool,
        keyboard_dictation_replacement / observe_keyboard_dictation_replacement: Option<String>,
        is_autocapitalization_enabled / observe_is_autocapitalization_enabled: bool,
        text_input_proxy / observe_text_input_proxy: Option<ProxyHandle>,
        device_type / observe_device_type: DeviceType,
        screen_size / observe_screen_size: Size,
        has_dictation_key / observe_has_dictation_key: bool,
        has_full_access / observe_has_full_access: bool,
        primary_language / observe_primary_language: Option<String>,
        needs_input_mode_switch_key / observe_needs_input_mode_switch_key: bool,
        text_input_mode / observe_text_input_mode: Option<TextInputMode>,
        keyboard_appearance / observe_keyboard_appearance: KeyboardAppearance,
        color_scheme / observe_color_scheme: ColorScheme,
        original_text_document_proxy / observe_original_text_document_proxy: Option<ProxyHandle>,
    }

    // --- Locale ---

    /// Identifier of the current locale. Always `self.locale().identifier()`.
    pub fn locale_identifier(&self) -> &str {
        self.locale.get().identifier()
    }

    /// Parse and select a locale. Never fails; see [`Locale::new`].
    pub fn set_locale_identifier(&mut self, identifier: &str) {
        self.set_locale(Locale::new(identifier));
    }

    pub fn set_locale(&mut self, locale: Locale) {
        if self.locale.set(locale) {
            debug!(locale = %self.locale.get(), "locale changed");
        }
    }

    pub fn keyboard_locale(&self) -> Option<KeyboardLocale> {
        KeyboardLocale::from_locale(self.locale.get())
    }

    pub fn set_keyboard_locale(&mut self, locale: KeyboardLocale) {
        self.set_locale(locale.locale());
    }

    /// Replace the cycling set. Order is kept as given.
    pub fn set_locales(&mut self, locales: Vec<Locale>) {
        self.locales.set(locales);
    }

    /// The locale `select_next_locale` would pick, or `None` if `locales` is empty.
    pub fn next_locale(&self) -> Option<&Locale> {
        let locales = self.locales.get();
        let first = locales.first()?;
        match locales.iter().position(|l| l == self.locale.get()) {
            Some(i) if i + 1 < locales.len() => Some(&locales[i + 1]),
            _ => Some(first),
        }
    }

    /// Select the entry after the current locale in `locales`, wrapping to the
    /// first entry when the current locale is last or not in the list.
    pub fn select_next_locale(&mut self) {
        let Some(next) = self.next_locale().cloned() else {
            trace!("select_next_locale: no locales");
            return;
        };
        self.set_locale(next);
    }

    pub fn has_current_locale(&self, candidate: &Locale) -> bool {
        candidate.identifier() == self.locale_identifier()
    }

    pub fn has_keyboard_locale(&self, candidate: KeyboardLocale) -> bool {
        candidate.id() == self.locale_identifier()
    }

    // --- Keyboard type and toggles ---

    pub fn set_keyboard_type(&mut self, keyboard_type: KeyboardType) {
        self.keyboard_type.set(keyboard_type);
    }

    pub fn has_keyboard_type(&self, candidate: &KeyboardType) -> bool {
        candidate == self.keyboard_type.get()
    }

    pub fn set_prefers_autocomplete(&mut self, value: bool) {
        self.prefers_autocomplete.set(value);
    }

    pub fn set_keyboard_dictation_replacement(&mut self, value: Option<String>) {
        self.keyboard_dictation_replacement.set(value);
    }

    pub fn set_is_autocapitalization_enabled(&mut self, value: bool) {
        self.is_autocapitalization_enabled.set(value);
    }

    /// Route text operations to another proxy, e.g. an in-keyboard text field.
    pub fn set_text_input_proxy(&mut self, proxy: Option<ProxyHandle>) {
        self.text_input_proxy.set(proxy);
    }

    /// The proxy text operations go to: the input proxy if set, else the host's.
    pub fn text_document_proxy(&self) -> Option<ProxyHandle> {
        let input = *self.text_input_proxy.get();
        input.or(*self.original_text_document_proxy.get())
    }

    // --- Host mirror ---

    /// Copy the host's capability values into the context.
    ///
    /// Every mirrored field is written on every call; listeners only hear
    /// about actual changes. Fields that need a layout pass on the host side
    /// are written after `config().host.deferred_turns` turns of `queue`; a
    /// newer sync replaces deferred writes that have not run yet.
    pub fn sync_with_host(&mut self, host: &HostState, queue: &mut MainQueue<KeyboardContext>) {
        debug!(
            has_full_access = host.has_full_access,
            width = host.screen_size.width,
            height = host.screen_size.height,
            "sync_with_host"
        );
        self.has_dictation_key.set(host.has_dictation_key);
        self.has_full_access.set(host.has_full_access);
        self.primary_language.set(host.primary_language.clone());
        self.screen_size.set(host.screen_size);
        self.text_input_mode.set(host.text_input_mode.clone());

        let deferred = host.deferred_fields();
        queue.defer_latest(HOST_SLOT, move |ctx: &mut KeyboardContext| {
            ctx.apply_deferred_host_fields(deferred)
        });
    }

    pub(crate) fn apply_deferred_host_fields(&mut self, fields: DeferredHostFields) {
        trace!(?fields, "applying deferred host fields");
        self.needs_input_mode_switch_key
            .set(fields.needs_input_mode_switch_key);
        self.keyboard_appearance
            .set(fields.traits.keyboard_appearance);
        self.color_scheme.set(fields.traits.color_scheme);
        self.original_text_document_proxy
            .set(fields.text_document_proxy);
    }
}

impl Default for KeyboardContext {
    fn default() -> Self {
        Self::new()
    }
}
