//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;
use url::Url;

use crate::candidates::FilterOptions;
use crate::unicode::is_token_break;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub trigger: TriggerSettings,
    pub filter: FilterSettings,
    pub render: RenderSettings,
}

impl Settings {
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            match_case: self.filter.match_case,
            max_results: self.filter.max_results,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerSettings {
    pub char: char,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterSettings {
    #[serde(default = "default_match_case")]
    pub match_case: bool,
    pub max_results: usize,
}

fn default_match_case() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderSettings {
    pub origin: Url,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    if is_token_break(s.trigger.char) {
        return Err(SettingsError::InvalidValue {
            field: "trigger.char".to_string(),
            reason: "must not be whitespace".to_string(),
        });
    }
    if s.filter.max_results == 0 {
        return Err(SettingsError::InvalidValue {
            field: "filter.max_results".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if s.render.origin.host_str().is_none() {
        return Err(SettingsError::InvalidValue {
            field: "render.origin".to_string(),
            reason: "must be an absolute URL with a host".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.trigger.char, '#');
        assert!(s.filter.match_case);
        assert_eq!(s.filter.max_results, 20);
        assert_eq!(s.render.origin.as_str(), "http://localhost/");
        let opts = s.filter_options();
        assert!(opts.match_case);
        assert_eq!(opts.max_results, 20);
    }

    #[test]
    fn parse_valid_custom_toml() {
        let toml = r##"
[trigger]
char = "@"

[filter]
match_case = false
max_results = 5

[render]
origin = "https://notes.example.com"
"##;
        let s = parse_settings_toml(toml).unwrap();
        assert_eq!(s.trigger.char, '@');
        assert!(!s.filter.match_case);
        assert_eq!(s.render.origin.host_str(), Some("notes.example.com"));
    }

    #[test]
    fn match_case_defaults_to_sensitive() {
        let toml = r##"
[trigger]
char = "#"

[filter]
max_results = 5

[render]
origin = "http://localhost"
"##;
        assert!(parse_settings_toml(toml).unwrap().filter.match_case);
    }

    #[test]
    fn error_multi_char_trigger() {
        let toml = r###"
[trigger]
char = "##"

[filter]
max_results = 5

[render]
origin = "http://localhost"
"###;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_whitespace_trigger() {
        let toml = r##"
[trigger]
char = " "

[filter]
max_results = 5

[render]
origin = "http://localhost"
"##;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(err.to_string().contains("trigger.char"));
    }

    #[test]
    fn error_zero_max_results() {
        let toml = r##"
[trigger]
char = "#"

[filter]
max_results = 0

[render]
origin = "http://localhost"
"##;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(err.to_string().contains("filter.max_results"));
    }

    #[test]
    fn error_origin_without_host() {
        let toml = r##"
[trigger]
char = "#"

[filter]
max_results = 5

[render]
origin = "mailto:someone@example.com"
"##;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(err.to_string().contains("render.origin"));

        let bad = toml.replace("mailto:someone@example.com", "not a url");
        assert!(matches!(
            parse_settings_toml(&bad).unwrap_err(),
            SettingsError::Parse(_)
        ));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_missing_section() {
        let toml = r##"
[trigger]
char = "#"
"##;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
