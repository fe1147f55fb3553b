//! User directory - supplies complete user lists to the users panel

use crate::config::Config;
use crate::model::User;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const BUILTIN_USERS: &str = r#"[
    { "id": 1, "email": "ada@example.com", "first_name": "Ada", "last_name": "Lovelace", "active": true },
    { "id": 2, "email": "grace@example.com", "first_name": "Grace", "last_name": "Hopper", "active": true },
    { "id": 3, "email": "alan@example.com", "first_name": "Alan", "last_name": "Turing", "active": false },
    { "id": 4, "email": "edsger@example.com", "first_name": "Edsger", "last_name": "Dijkstra", "active": true },
    { "id": 5, "email": "barbara@example.com", "first_name": "Barbara", "last_name": "Liskov", "active": true }
]"#;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Builtin,
    File(PathBuf),
}

/// Where user lists come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDirectory {
    source: Source,
}

impl UserDirectory {
    pub fn builtin() -> Self {
        Self {
            source: Source::Builtin,
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        match &config.users_file {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    /// Load the full user list
    pub fn fetch(&self) -> Result<Vec<User>> {
        let users = match &self.source {
            Source::Builtin => parse_users(BUILTIN_USERS)?,
            Source::File(path) => load_users(path)?,
        };
        tracing::info!(count = users.len(), "users fetched");
        Ok(users)
    }
}

fn load_users(path: &Path) -> Result<Vec<User>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read users from {}", path.display()))?;
    parse_users(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_users(json: &str) -> Result<Vec<User>> {
    let users: Vec<User> = serde_json::from_str(json).context("Invalid user list")?;
    Ok(users)
}
