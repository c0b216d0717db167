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

/// Install a custom settings file before any command reads `settings()`.
pub fn load_config(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    die!(tag_core::settings::init_custom(content), "Error: {}");
}

pub fn settings_export() {
    print!("{}", tag_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        tag_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: trigger.char={:?}, filter.match_case={}, filter.max_results={}, render.origin={}",
        s.trigger.char, s.filter.match_case, s.filter.max_results, s.render.origin
    );
}
