use std::path::Path;
use std::process;

use keyctx_core::config::config;
use keyctx_core::store::{FileStore, SettingsStore};
use serde_json::Value;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// List entries, optionally only those of one key domain (e.g. `autocomplete`).
pub fn store_list(dir: &Path, domain: Option<&str>) {
    let store = FileStore::in_dir(dir);
    let mut entries = die!(store.load(), "Error reading {}: {}", store.path().display());
    if let Some(domain) = domain {
        let prefix = config().store_key_prefix(domain);
        entries.retain(|key, _| key.starts_with(&prefix));
    }
    if entries.is_empty() {
        println!("(empty)");
        return;
    }
    for (key, value) in &entries {
        println!("{key}\t{value}");
    }
    println!("---");
    println!("{} entries", entries.len());
}

pub fn store_get(dir: &Path, key: &str) {
    match FileStore::in_dir(dir).get(key) {
        Some(value) => println!("{value}"),
        None => {
            eprintln!("Not found: {key}");
            process::exit(1);
        }
    }
}

/// `raw` is parsed as JSON; anything that isn't valid JSON is stored as a string.
pub fn store_set(dir: &Path, key: &str, raw: &str) {
    let value = parse_value(raw);
    let store = FileStore::in_dir(dir);
    die!(store.set(key, value.clone()), "Error writing {key}: {}");
    println!("Set: {key} = {value}");
}

pub fn store_remove(dir: &Path, key: &str) {
    die!(FileStore::in_dir(dir).remove(key), "Error removing {key}: {}");
    println!("Removed: {key}");
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
