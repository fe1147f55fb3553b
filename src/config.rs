use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Viewport width (in columns) at or below which the sidebar closes on an
/// outside click
pub const DEFAULT_BREAKPOINT: u16 = 768;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sidebar_breakpoint: u16,
    /// Event poll timeout in milliseconds
    pub tick_rate_ms: u64,
    /// Default log filter; `RUST_LOG` takes precedence
    pub log_level: String,
    /// JSON file with the user list; the built-in directory is used when unset
    pub users_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sidebar_breakpoint: DEFAULT_BREAKPOINT,
            tick_rate_ms: 100,
            log_level: "info".to_string(),
            users_file: None,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".userdeck"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        Self::from_json(&contents).ok()
    }

    /// Load the saved config, falling back to defaults
    pub fn load_or_default() -> Config {
        Self::load().unwrap_or_default()
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Config> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = Config::from_json(r#"{"sidebar_breakpoint": 100}"#).unwrap();
        assert_eq!(config.sidebar_breakpoint, 100);
        assert_eq!(config.tick_rate_ms, 100);
        assert_eq!(config.log_level, "info");
        assert!(config.users_file.is_none());
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = Config {
            users_file: Some("/tmp/users.json".to_string()),
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(Config::from_json("{ not json").is_err());
    }
}
