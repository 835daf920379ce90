use crate::models::Package;

pub const DEFAULT_BASE_URL: &str = "https://unpkg.com";

/// File names probed inside a published package, in order.
const LICENSE_FILES: [&str; 6] = [
    "LICENSE",
    "LICENSE.md",
    "LICENSE.txt",
    "license",
    "license.md",
    "License.md",
];

/// URLs to try for `pkg`: the CDN's copies of the usual license files,
/// then the override URL if one was configured.
pub fn candidate_urls(base: &str, pkg: &Package, override_url: Option<&str>) -> Vec<String> {
    let base = base.trim_end_matches('/');
    let mut urls: Vec<String> = LICENSE_FILES
        .iter()
        .map(|file| format!("{}/{}@{}/{}", base, pkg.name, pkg.version, file))
        .collect();
    if let Some(url) = override_url {
        urls.push(url.to_string());
    }
    urls
}
