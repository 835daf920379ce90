use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Root configuration structure, deserialized from `.license-harvest/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub policy: PolicyConfig,
    pub download: DownloadConfig,
}

/// Output locations. Relative paths resolve against the project directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub manifest: PathBuf,
    pub texts: PathBuf,
    pub cache: PathBuf,
    pub report: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            manifest: PathBuf::from("licenses/licenses.csv"),
            texts: PathBuf::from("licenses/texts"),
            cache: PathBuf::from("licenses/cache.json"),
            report: PathBuf::from("public/licenses.html"),
        }
    }
}

impl PathsConfig {
    /// Resolve every path against `project`.
    pub fn resolve(&self, project: &Path) -> PathsConfig {
        PathsConfig {
            manifest: project.join(&self.manifest),
            texts: project.join(&self.texts),
            cache: project.join(&self.cache),
            report: project.join(&self.report),
        }
    }
}

/// When a run should fail.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Only walk the trees of `package.json` production dependencies.
    pub production_only: bool,
    pub fail_on_unknown: bool,
    pub fail_on_copyleft: bool,
    /// Fail the download step when any license text could not be fetched.
    pub fail_on_missing: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            production_only: false,
            fail_on_unknown: false,
            fail_on_copyleft: false,
            fail_on_missing: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub timeout_secs: u64,
    /// Packages fetched concurrently per batch.
    pub concurrency: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        DownloadConfig {
            timeout_secs: 10,
            concurrency: 8,
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.license-harvest/config.toml`
/// 3. `~/.config/license-harvest/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".license-harvest").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-harvest")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
}
