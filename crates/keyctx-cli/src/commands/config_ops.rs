use std::fs;
use std::process;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn config_export() {
    print!("{}", keyctx_core::config::default_toml());
}

pub fn config_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let c = die!(keyctx_core::config::parse_config_toml(&content), "Error: {}");
    println!(
        "OK: store.namespace={}, locale.default={}, autocomplete.suggestions_display_count={}",
        c.store.namespace, c.locale.default, c.autocomplete.suggestions_display_count
    );
}
