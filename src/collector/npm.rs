use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::models::{Package, UNKNOWN_LICENSE};
use crate::overrides::Overrides;

/// Walks the tree reported by `npm list --json --all --long --omit=peer`.
pub struct NpmCollector<'a> {
    overrides: &'a Overrides,
    production_only: bool,
    /// Pre-captured `npm list` output; when unset npm is invoked.
    npm_json: Option<PathBuf>,
}

impl<'a> NpmCollector<'a> {
    pub fn new(overrides: &'a Overrides) -> Self {
        NpmCollector {
            overrides,
            production_only: false,
            npm_json: None,
        }
    }

    pub fn production_only(mut self, enabled: bool) -> Self {
        self.production_only = enabled;
        self
    }

    pub fn npm_json(mut self, path: Option<PathBuf>) -> Self {
        self.npm_json = path;
        self
    }
}

impl super::Collector for NpmCollector<'_> {
    fn collect(&self, path: &Path) -> Result<Vec<Package>> {
        let raw = match &self.npm_json {
            Some(file) => std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?,
            None => run_npm_list(path)?,
        };
        let tree: Value = serde_json::from_str(&raw).context("npm list produced invalid JSON")?;

        let filter = if self.production_only {
            production_dependencies(path)
        } else {
            None
        };

        Ok(extract_packages(&tree, self.overrides, filter.as_ref()))
    }
}

/// Run `npm list`. npm exits non-zero on tree warnings while still printing
/// a usable tree, so any non-empty stdout is accepted.
fn run_npm_list(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "running npm list");
    let output = Command::new("npm")
        .args(["list", "--json", "--all", "--long", "--omit=peer"])
        .current_dir(path)
        .output()
        .context("Failed to run `npm list`; is npm installed?")?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if stdout.trim().is_empty() {
        bail!(
            "`npm list` produced no output: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    if !output.status.success() {
        warn!(status = %output.status, "npm list reported problems; using its output anyway");
    }
    Ok(stdout)
}

/// Names of the direct production dependencies from `package.json`, or
/// `None` (no filtering) when the file cannot be read or declares none.
fn production_dependencies(path: &Path) -> Option<HashSet<String>> {
    let manifest = path.join("package.json");
    let parsed = std::fs::read_to_string(&manifest)
        .ok()
        .and_then(|content| serde_json::from_str::<Value>(&content).ok());

    let Some(json) = parsed else {
        warn!(
            path = %manifest.display(),
            "could not read package.json for production-only mode; scanning the full tree"
        );
        return None;
    };

    let names: HashSet<String> = json
        .get("dependencies")
        .and_then(Value::as_object)
        .map(|deps| deps.keys().cloned().collect())
        .unwrap_or_default();
    if names.is_empty() {
        warn!("package.json declares no production dependencies; scanning the full tree");
        return None;
    }
    info!(count = names.len(), "production-only mode");
    Some(names)
}

/// Flatten the `npm list` tree into unique packages sorted by name.
///
/// With `production`, only top-level entries in that set are walked; their
/// transitive dependencies are always included.
pub fn extract_packages(
    tree: &Value,
    overrides: &Overrides,
    production: Option<&HashSet<String>>,
) -> Vec<Package> {
    let mut seen = HashSet::new();
    let mut packages = Vec::new();

    if let Some(deps) = tree.get("dependencies").and_then(Value::as_object) {
        let top: Map<String, Value> = deps
            .iter()
            .filter(|(name, _)| production.map_or(true, |set| set.contains(*name)))
            .map(|(name, info)| (name.clone(), info.clone()))
            .collect();
        walk(&top, overrides, &mut seen, &mut packages);
    }

    packages.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version)));
    packages
}

fn walk(
    deps: &Map<String, Value>,
    overrides: &Overrides,
    seen: &mut HashSet<String>,
    out: &mut Vec<Package>,
) {
    for (name, info) in deps {
        // Missing or unmet entries carry no version.
        if let Some(version) = info.get("version").and_then(Value::as_str) {
            let key = format!("{}@{}", name, version);
            if seen.insert(key.clone()) {
                out.push(resolve(name, version, info, overrides, &key));
            }
        }

        if let Some(children) = info.get("dependencies").and_then(Value::as_object) {
            walk(children, overrides, seen, out);
        }
    }
}

fn resolve(name: &str, version: &str, info: &Value, overrides: &Overrides, key: &str) -> Package {
    let mut license = declared_license(info).unwrap_or_else(|| UNKNOWN_LICENSE.to_string());
    let mut license_url = None;

    if let Some(entry) = overrides.get(key) {
        if let Some(l) = &entry.license {
            info!(package = %key, license = %l, "applied license override");
            license = l.clone();
        }
        license_url = entry.license_url.clone().filter(|u| !u.is_empty());
    }

    let license_url = license_url.or_else(|| infer_license_url(name, version, info));
    Package::new(name, version, license, license_url)
}

/// `license` as a string, or the legacy `{ "type": ... }` object form.
fn declared_license(info: &Value) -> Option<String> {
    let license = info.get("license")?;
    let text = match license {
        Value::String(s) => s.as_str(),
        Value::Object(o) => o.get("type")?.as_str()?,
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn infer_license_url(name: &str, version: &str, info: &Value) -> Option<String> {
    if info.get("resolved").is_some() {
        return Some(format!("https://www.npmjs.com/package/{}/v/{}", name, version));
    }
    match info.get("repository")? {
        Value::String(s) => Some(s.clone()),
        Value::Object(o) => {
            let url = o.get("url")?.as_str()?;
            let url = url.strip_prefix("git+").unwrap_or(url);
            let url = url.strip_suffix(".git").unwrap_or(url);
            Some(url.to_string())
        }
        _ => None,
    }
}
