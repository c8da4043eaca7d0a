//! Global configuration loaded from TOML, following a lazy `OnceLock` singleton.
//!
//! - `init_custom(toml_content)` sets a custom TOML before the first `config()` call
//! - `config()` returns `&'static Config` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_config.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

use crate::locale::Locale;

pub const DEFAULT_CONFIG_TOML: &str = include_str!("default_config.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before the first `config()` call.
pub fn init_custom(toml_content: String) -> Result<(), ConfigError> {
    parse_config_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| ConfigError::AlreadyInitialized)
}

/// Get or initialize the global config singleton.
pub fn config() -> &'static Config {
    static INSTANCE: OnceLock<Config> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_CONFIG_TOML);
        parse_config_toml(toml_str).expect("config TOML must be valid")
    })
}

/// Returns the embedded default config TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_CONFIG_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("config already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub locale: LocaleConfig,
    pub autocomplete: AutocompleteDefaults,
    pub sync: SyncConfig,
    pub host: HostConfig,
}

impl Config {
    /// Namespaced store key, e.g. `com.keyboardkit.settings.autocomplete.lastSynced`.
    pub fn store_key(&self, domain: &str, name: &str) -> String {
        format!("{}.{}.{}", self.store.namespace, domain, name)
    }

    /// Prefix shared by every key of one domain, including the trailing dot.
    pub fn store_key_prefix(&self, domain: &str) -> String {
        format!("{}.{}.", self.store.namespace, domain)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub namespace: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    pub default: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutocompleteDefaults {
    pub is_autocomplete_enabled: bool,
    pub is_autocorrect_enabled: bool,
    pub suggestions_display_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    pub initial_staleness_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    pub deferred_turns: u32,
}

pub fn parse_config_toml(toml_str: &str) -> Result<Config, ConfigError> {
    let c: Config = toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&c)?;
    Ok(c)
}

fn validate(c: &Config) -> Result<(), ConfigError> {
    macro_rules! check_positive {
        ($section:ident . $field:ident) => {
            if c.$section.$field == 0 {
                return Err(ConfigError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    let ns = &c.store.namespace;
    if ns.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "store.namespace".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if ns.starts_with('.') || ns.ends_with('.') || ns.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            field: "store.namespace".to_string(),
            reason: "must not start or end with '.' or contain whitespace".to_string(),
        });
    }

    if let Err(e) = Locale::parse(&c.locale.default) {
        return Err(ConfigError::InvalidValue {
            field: "locale.default".to_string(),
            reason: e.to_string(),
        });
    }

    check_positive!(autocomplete.suggestions_display_count);
    check_positive!(host.deferred_turns);

    Ok(())
}
