//! Process-wide component registry
//!
//! Components are created by tag name. Defining a tag that already exists is
//! a no-op: the first definition stays in effect, so registering the same
//! set of components twice is harmless.

use crate::component::Component;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Builds a fresh, unmounted component
pub type Factory = fn() -> Box<dyn Component>;

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)+$").unwrap());

static REGISTRY: LazyLock<Mutex<HashMap<String, Factory>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("'{0}' is not a valid tag name (lowercase, with at least one hyphen)")]
    InvalidTag(String),
    #[error("no component is defined for <{0}>")]
    Undefined(String),
}

// Entries are only ever inserted, so a poisoned map is still consistent.
fn registry() -> MutexGuard<'static, HashMap<String, Factory>> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Define `tag`; returns false when the tag was already defined
pub fn define(tag: &str, factory: Factory) -> Result<bool, RegistryError> {
    if !TAG_REGEX.is_match(tag) {
        return Err(RegistryError::InvalidTag(tag.to_string()));
    }

    let mut registry = registry();
    if registry.contains_key(tag) {
        tracing::debug!(tag, "tag already defined, keeping first definition");
        return Ok(false);
    }
    registry.insert(tag.to_string(), factory);
    tracing::debug!(tag, "tag defined");
    Ok(true)
}

pub fn is_defined(tag: &str) -> bool {
    registry().contains_key(tag)
}

/// Create a new instance of the component defined for `tag`
pub fn create(tag: &str) -> Result<Box<dyn Component>, RegistryError> {
    let factory = registry()
        .get(tag)
        .copied()
        .ok_or_else(|| RegistryError::Undefined(tag.to_string()))?;
    Ok(factory())
}
