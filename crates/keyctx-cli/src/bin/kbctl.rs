use std::path::PathBuf;

use clap::{Parser, Subcommand};

use keyctx_cli::commands::settings_ops::SettingsEdit;
use keyctx_cli::commands::{config_ops, cycle_ops, default_store_dir, settings_ops, store_ops};

#[derive(Parser)]
#[command(name = "kbctl", about = "Keyboard context and settings store tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export the default config as TOML
    ConfigExport,
    /// Validate a custom config TOML file
    ConfigValidate {
        /// Path to the TOML file
        file: String,
    },
    /// Inspect or edit raw store entries
    Store {
        /// Store directory (default: the app-group preferences directory)
        #[arg(long)]
        dir: Option<PathBuf>,
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Show autocomplete settings and the last sync time
    SettingsShow {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Edit autocomplete settings as the containing app
    SettingsSet {
        #[arg(long)]
        dir: Option<PathBuf>,
        #[arg(long)]
        autocomplete: Option<bool>,
        #[arg(long)]
        autocorrect: Option<bool>,
        /// Suggestions display count
        #[arg(long)]
        count: Option<u32>,
    },
    /// Launch a keyboard against the store and print its context as JSON
    Sync {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Print the locales selected by repeated next-locale switches
    Cycle {
        /// Comma-separated locale identifiers
        #[arg(long, value_delimiter = ',')]
        locales: Vec<String>,
        /// Current locale identifier
        #[arg(long)]
        current: String,
        /// Number of switches
        #[arg(short, long, default_value = "1")]
        n: usize,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// List entries
    List {
        /// Only keys of this domain, e.g. `autocomplete` or `context`
        #[arg(long)]
        domain: Option<String>,
    },
    /// Print one entry as JSON
    Get { key: String },
    /// Set an entry (JSON, or a bare string)
    Set { key: String, value: String },
    /// Remove an entry
    Remove { key: String },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::ConfigExport => config_ops::config_export(),
        Command::ConfigValidate { file } => config_ops::config_validate(&file),
        Command::Store { dir, action } => {
            let dir = dir.unwrap_or_else(default_store_dir);
            match action {
                StoreAction::List { domain } => store_ops::store_list(&dir, domain.as_deref()),
                StoreAction::Get { key } => store_ops::store_get(&dir, &key),
                StoreAction::Set { key, value } => store_ops::store_set(&dir, &key, &value),
                StoreAction::Remove { key } => store_ops::store_remove(&dir, &key),
            }
        }
        Command::SettingsShow { dir } => {
            settings_ops::settings_show(&dir.unwrap_or_else(default_store_dir))
        }
        Command::SettingsSet {
            dir,
            autocomplete,
            autocorrect,
            count,
        } => {
            let edit = SettingsEdit {
                autocomplete,
                autocorrect,
                count,
            };
            settings_ops::settings_set(&dir.unwrap_or_else(default_store_dir), &edit);
        }
        Command::Sync { dir } => settings_ops::sync(&dir.unwrap_or_else(default_store_dir)),
        Command::Cycle {
            locales,
            current,
            n,
        } => cycle_ops::cycle(&locales, &current, n),
    }
}
