//! Runtime configuration read from the environment.

use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_PREFS_FILE: &str = "preferences.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP server binds to (`RETURN_ENGINE_BIND_ADDR`).
    pub bind_addr: String,
    /// File holding the persisted language preference
    /// (`RETURN_ENGINE_PREFS_FILE`).
    pub prefs_file: PathBuf,
    /// Default log filter when `RUST_LOG` is unset (`RETURN_ENGINE_LOG`).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            prefs_file: PathBuf::from(DEFAULT_PREFS_FILE),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup("RETURN_ENGINE_BIND_ADDR").unwrap_or(defaults.bind_addr),
            prefs_file: lookup("RETURN_ENGINE_PREFS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.prefs_file),
            log_level: lookup("RETURN_ENGINE_LOG").unwrap_or(defaults.log_level),
        }
    }
}
