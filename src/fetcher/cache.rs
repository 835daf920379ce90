use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Persistent `name@version -> file name` map of downloaded license texts.
#[derive(Debug)]
pub struct LicenseCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LicenseCache {
    /// Load the cache, or start empty when the file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring corrupt license cache");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        debug!(path = %path.display(), entries = entries.len(), "license cache loaded");

        LicenseCache {
            path: path.to_path_buf(),
            entries,
        }
    }

    /// Cached file name for `key`, only if that file still exists in `texts_dir`.
    pub fn lookup(&self, key: &str, texts_dir: &Path) -> Option<&str> {
        self.entries
            .get(key)
            .filter(|file| texts_dir.join(file.as_str()).is_file())
            .map(String::as_str)
    }

    pub fn insert(&mut self, key: String, file: String) {
        self.entries.insert(key, file);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write cache {}", self.path.display()))
    }
}
