//! Manual license overrides, keyed by `name@version`.
//!
//! ```yaml
//! overrides:
//!   some-package@1.2.3:
//!     license: MIT
//!     licenseUrl: https://example.com/LICENSE
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Override {
    pub license: Option<String>,
    #[serde(rename = "licenseUrl")]
    pub license_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OverridesFile {
    #[serde(default)]
    overrides: Option<HashMap<String, Override>>,
}

#[derive(Debug, Default)]
pub struct Overrides {
    entries: HashMap<String, Override>,
}

impl Overrides {
    pub fn get(&self, key: &str) -> Option<&Override> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        let file: OverridesFile = serde_yaml::from_str(content)?;
        Ok(Overrides {
            entries: file.overrides.unwrap_or_default(),
        })
    }
}

/// Candidate override files, most specific first.
pub fn candidate_paths(project: &Path) -> [PathBuf; 3] {
    [
        project.join("license-overrides.yml"),
        project.join(".github").join("license-overrides.yml"),
        project.join("licenses").join("overrides.yml"),
    ]
}

/// Locate and load the overrides file.
///
/// A missing or malformed file yields an empty set; neither stops the run.
pub fn load_overrides(project: &Path, explicit: Option<&Path>) -> Overrides {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => candidate_paths(project).into_iter().find(|p| p.exists()),
    };

    let Some(path) = path else {
        info!("no license overrides file found");
        return Overrides::default();
    };

    let loaded = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|content| Overrides::parse(&content).map_err(|e| e.to_string()));

    match loaded {
        Ok(overrides) => {
            info!(path = %path.display(), count = overrides.len(), "loaded license overrides");
            overrides
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load license overrides");
            Overrides::default()
        }
    }
}
