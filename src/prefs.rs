//! Language preference persistence.
//!
//! The active locale is the only value kept across sessions.  It lives
//! in a small key-value store behind the [`PreferenceStore`] trait so
//! the server can persist it to disk while tests use memory.

use crate::locale::Locale;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{info, warn};

/// Key under which the locale is stored.
pub const LANGUAGE_KEY: &str = "language";

/// A string key-value store.
///
/// Stores must be thread-safe (`Send + Sync`) because request handlers
/// share one instance.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow::anyhow!("preference store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow::anyhow!("preference store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept as a flat JSON object in a single file.
///
/// A missing file reads as empty.  Every write rewrites the whole file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading preferences from {:?}", self.path))?;
        serde_json::from_str(&data)
            .with_context(|| format!("parsing preferences in {:?}", self.path))
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self
            .lock
            .read()
            .map_err(|_| anyhow::anyhow!("preference file lock poisoned"))?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .lock
            .write()
            .map_err(|_| anyhow::anyhow!("preference file lock poisoned"))?;
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        let data = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, data)
            .with_context(|| format!("writing preferences to {:?}", self.path))
    }
}

/// Read the stored locale.  Absent or unrecognised values fall back to
/// Arabic.
pub fn load_locale(store: &dyn PreferenceStore) -> Result<Locale> {
    let Some(code) = store.get(LANGUAGE_KEY)? else {
        return Ok(Locale::default());
    };
    Ok(code.parse::<Locale>().unwrap_or_else(|err| {
        warn!(%err, "ignoring stored language");
        Locale::default()
    }))
}

pub fn save_locale(store: &dyn PreferenceStore, locale: Locale) -> Result<()> {
    store.set(LANGUAGE_KEY, locale.code())
}

/// Flip the stored locale and persist the new one.
pub fn toggle_locale(store: &dyn PreferenceStore) -> Result<Locale> {
    let next = load_locale(store)?.toggle();
    save_locale(store, next)?;
    info!(locale = %next, "language toggled");
    Ok(next)
}
