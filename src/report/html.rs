//! HTML license page rendered from a Jinja template.
//!
//! A project can ship its own `licenses.html.j2`; otherwise the built-in
//! template is used. Templates receive `licenses`, `license_counts`
//! (`(license, count)` pairs, most frequent first) and `total_count`.
//! Output is HTML-escaped regardless of the template's file name.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use minijinja::{context, AutoEscape, Environment};
use serde::Serialize;
use tracing::{debug, info};

use crate::fetcher::license_filename;
use crate::license::LicenseSummary;
use crate::manifest::load_manifest;
use crate::models::LicenseEntry;

pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/licenses.html.j2");

/// Template file looked up in the project directory.
pub const LOCAL_TEMPLATE: &str = "licenses.html.j2";

const TEMPLATE_NAME: &str = "licenses.html";

#[derive(Serialize)]
struct TemplateLicense<'a> {
    name: &'a str,
    version: &'a str,
    license: &'a str,
    license_url: Option<&'a str>,
    license_text: Option<&'a str>,
}

/// The project's own template, if it has one.
pub fn find_template(project: &Path) -> Option<PathBuf> {
    let local = project.join(LOCAL_TEMPLATE);
    local.is_file().then_some(local)
}

/// Render `entries` through the Jinja `template` source.
pub fn render_html(entries: &[LicenseEntry], template: &str) -> Result<String> {
    let packages: Vec<_> = entries.iter().map(|e| e.package.clone()).collect();
    let summary = LicenseSummary::build(&packages)?;

    let licenses: Vec<TemplateLicense<'_>> = entries
        .iter()
        .map(|e| TemplateLicense {
            name: &e.package.name,
            version: &e.package.version,
            license: &e.package.license,
            license_url: e.package.license_url.as_deref().filter(|u| !u.is_empty()),
            license_text: e.text.as_deref(),
        })
        .collect();

    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template(TEMPLATE_NAME, template)
        .context("Invalid report template")?;

    let html = env
        .get_template(TEMPLATE_NAME)?
        .render(context! {
            licenses => licenses,
            license_counts => summary.counts,
            total_count => entries.len(),
        })
        .context("Failed to render report template")?;
    Ok(html)
}

/// Attach license texts from `texts_dir` to the manifest rows.
pub fn collect_entries(manifest: &Path, texts_dir: &Path) -> Result<Vec<LicenseEntry>> {
    let packages = load_manifest(manifest)?;
    let entries = packages
        .into_iter()
        .map(|package| {
            let path = texts_dir.join(license_filename(&package.name, &package.version));
            let text = std::fs::read(&path)
                .ok()
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
            if text.is_none() {
                debug!(package = %package.key(), "no license text on disk");
            }
            LicenseEntry { package, text }
        })
        .collect();
    Ok(entries)
}

/// Render the report for `manifest` and write it to `report_path`.
pub fn write_report(
    project: &Path,
    manifest: &Path,
    texts_dir: &Path,
    report_path: &Path,
) -> Result<usize> {
    let entries = collect_entries(manifest, texts_dir)?;

    let html = match find_template(project) {
        Some(path) => {
            info!(path = %path.display(), "using local report template");
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            render_html(&entries, &source)?
        }
        None => render_html(&entries, DEFAULT_TEMPLATE)?,
    };

    if let Some(parent) = report_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(report_path, html)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;

    info!(path = %report_path.display(), packages = entries.len(), "report written");
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::save_manifest;
    use crate::models::Package;

    fn sample_entries() -> Vec<LicenseEntry> {
        vec![
            LicenseEntry {
                package: Package::new(
                    "<script>",
                    "1.0.0",
                    "MIT",
                    Some("https://example.com/?a=1&b=2".to_string()),
                ),
                text: Some("Copyright <you>".to_string()),
            },
            LicenseEntry {
                package: Package::new("plain", "2.0.0", "MIT", None),
                text: None,
            },
        ]
    }

    #[test]
    fn test_default_template_escapes_and_marks_missing_text() {
        let html = render_html(&sample_entries(), DEFAULT_TEMPLATE).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("a=1&amp;b=2"));
        assert!(!html.contains("a=1&b=2"));
        assert!(html.contains("<pre>Copyright &lt;you&gt;</pre>"));
        assert!(html.contains("License text not available."));
        assert!(html.contains("<tr><td>MIT</td><td>2</td></tr>"));
        assert!(html.contains("uses 2 third-party packages"));
    }

    #[test]
    fn test_custom_template_context() {
        let template = "{{ total_count }}|\
            {% for license, count in license_counts %}{{ license }}={{ count }};{% endfor %}|\
            {% for lic in licenses %}{{ lic.name }}@{{ lic.version }}:{{ lic.license_text or 'none' }} {% endfor %}";
        let html = render_html(&sample_entries(), template).unwrap();
        assert_eq!(
            html,
            "2|MIT=2;|&lt;script&gt;@1.0.0:Copyright &lt;you&gt; plain@2.0.0:none "
        );
    }

    #[test]
    fn test_invalid_template_is_error() {
        assert!(render_html(&sample_entries(), "{% for x in %}").is_err());
    }

    fn write_fixture(dir: &Path) -> (PathBuf, PathBuf) {
        let manifest = dir.join("licenses.csv");
        let texts = dir.join("texts");
        std::fs::create_dir_all(&texts).unwrap();
        save_manifest(
            &manifest,
            &[
                Package::new("@scope/pkg", "1.0.0", "ISC", None),
                Package::new("other", "3.1.0", "MIT", None),
            ],
        )
        .unwrap();
        std::fs::write(texts.join("_scope_pkg-1.0.0.txt"), "ISC text").unwrap();
        (manifest, texts)
    }

    #[test]
    fn test_write_report_reads_texts() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, texts) = write_fixture(dir.path());

        let report = dir.path().join("public").join("licenses.html");
        let count = write_report(dir.path(), &manifest, &texts, &report).unwrap();
        assert_eq!(count, 2);

        let html = std::fs::read_to_string(&report).unwrap();
        assert!(html.contains("<pre>ISC text</pre>"));
        assert!(html.contains("License text not available."));
    }

    #[test]
    fn test_write_report_prefers_project_template() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, texts) = write_fixture(dir.path());
        std::fs::write(
            dir.path().join(LOCAL_TEMPLATE),
            "<ul>{% for lic in licenses %}<li>{{ lic.license }}</li>{% endfor %}</ul>",
        )
        .unwrap();
        assert!(find_template(dir.path()).is_some());

        let report = dir.path().join("out.html");
        write_report(dir.path(), &manifest, &texts, &report).unwrap();
        assert_eq!(
            std::fs::read_to_string(&report).unwrap(),
            "<ul><li>ISC</li><li>MIT</li></ul>"
        );
    }
}
