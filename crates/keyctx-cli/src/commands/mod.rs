pub mod config_ops;
pub mod cycle_ops;
pub mod settings_ops;
pub mod store_ops;

use std::path::PathBuf;

pub fn default_store_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(format!(
        "{home}/Library/Group Containers/group.keyboardkit/Library/Preferences"
    ))
}
