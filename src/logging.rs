//! Diagnostic logging
//!
//! The terminal belongs to the UI, so log output goes to a file in the
//! config directory, or the temp directory when that is unusable.
//! `RUST_LOG` overrides the configured level.

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "userdeck.log";

pub fn log_path() -> Option<PathBuf> {
    Config::config_dir().map(|dir| dir.join(LOG_FILE))
}

/// Log file locations in order of preference
fn candidates() -> Vec<PathBuf> {
    log_path()
        .into_iter()
        .chain(std::iter::once(env::temp_dir().join(LOG_FILE)))
        .collect()
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))
}

/// Open the first usable log file
fn open_first(paths: &[PathBuf]) -> Result<(File, PathBuf)> {
    let mut last_err = anyhow!("No log file location available");
    for path in paths {
        match open_log(path) {
            Ok(file) => return Ok((file, path.clone())),
            Err(err) => last_err = err,
        }
    }
    Err(last_err)
}

fn filter(config: &Config) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("Invalid log level '{}'", config.log_level))
}

/// Install the global subscriber
///
/// Callers may treat an error as "run without logs".
pub fn init(config: &Config) -> Result<()> {
    let (file, path) = open_first(&candidates())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(config)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!(e))?;

    tracing::info!(path = %path.display(), "logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_lives_in_config_dir() {
        if let (Some(path), Some(dir)) = (log_path(), Config::config_dir()) {
            assert_eq!(path, dir.join("userdeck.log"));
        }
    }

    #[test]
    fn test_temp_dir_is_always_a_candidate() {
        let paths = candidates();
        assert_eq!(paths.last(), Some(&env::temp_dir().join(LOG_FILE)));
    }

    #[test]
    fn test_unusable_location_falls_back() {
        let dir = env::temp_dir().join(format!("userdeck-logging-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        // A regular file where a directory is expected
        let blocker = dir.join("blocker");
        fs::write(&blocker, "").unwrap();

        let unusable = blocker.join("nested").join(LOG_FILE);
        let usable = dir.join(LOG_FILE);
        let (_, chosen) = open_first(&[unusable.clone(), usable.clone()]).unwrap();
        assert_eq!(chosen, usable);
        assert!(open_first(&[unusable]).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_configured_level_is_parsed() {
        let config = Config {
            log_level: "debug".to_string(),
            ..Config::default()
        };
        assert!(filter(&config).is_ok());
    }
}
