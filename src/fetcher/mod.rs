//! License text retrieval.
//!
//! For every manifest package the fetcher probes a CDN copy of the
//! published package for a license file, writes the first hit into the
//! texts directory, and remembers it in an on-disk cache keyed by
//! `name@version` so later runs skip the network.
//!
//! - [`unpkg`] — candidate URLs per package.
//! - [`http`] — HTTP client with redirect following.
//! - [`cache`] — the persistent cache file.

pub mod cache;
pub mod http;
pub mod unpkg;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::{debug, info};

use crate::models::{FetchStatus, Package};
use crate::overrides::Overrides;
use cache::LicenseCache;

/// Replace every byte outside `[A-Za-z0-9.-]` with `_`.
pub fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// File name of a package's license text inside the texts directory.
pub fn license_filename(name: &str, version: &str) -> String {
    format!("{}-{}.txt", sanitize(name), sanitize(version))
}

pub struct FetchOptions {
    pub texts_dir: PathBuf,
    pub cache_path: PathBuf,
    pub timeout: Duration,
    pub concurrency: usize,
    pub base_url: String,
    pub quiet: bool,
}

/// Per-package results of a download run, in manifest order.
#[derive(Debug, Default)]
pub struct FetchSummary {
    pub outcomes: Vec<(String, FetchStatus)>,
}

impl FetchSummary {
    pub fn downloaded(&self) -> usize {
        self.count(|s| matches!(s, FetchStatus::Downloaded { .. }))
    }

    pub fn cached(&self) -> usize {
        self.count(|s| matches!(s, FetchStatus::Cached { .. }))
    }

    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(key, status)| match status {
                FetchStatus::Failed { reason } => Some((key.as_str(), reason.as_str())),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&FetchStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, s)| pred(s)).count()
    }
}

/// Fetch license texts for `packages`, reusing cached files.
pub async fn fetch_licenses(
    packages: &[Package],
    overrides: &Overrides,
    opts: &FetchOptions,
) -> Result<FetchSummary> {
    std::fs::create_dir_all(&opts.texts_dir)
        .with_context(|| format!("Failed to create {}", opts.texts_dir.display()))?;

    let mut cache = LicenseCache::load(&opts.cache_path);
    let client = http::build_client(opts.timeout)?;
    let batch_size = opts.concurrency.max(1);

    let pb = if !opts.quiet {
        let pb = ProgressBar::new(packages.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut summary = FetchSummary::default();

    for batch in packages.chunks(batch_size) {
        let futures: Vec<_> = batch
            .iter()
            .map(|pkg| {
                let key = pkg.key();
                let cached = cache
                    .lookup(&key, &opts.texts_dir)
                    .map(str::to_string);
                let override_url = overrides
                    .get(&key)
                    .and_then(|o| o.license_url.as_deref())
                    .filter(|u| !u.is_empty());
                let urls = unpkg::candidate_urls(&opts.base_url, pkg, override_url);
                let file = license_filename(&pkg.name, &pkg.version);
                let dest = opts.texts_dir.join(&file);
                let client = client.clone();
                async move {
                    let status = match cached {
                        Some(file) => FetchStatus::Cached { file },
                        None => fetch_one(&client, &key, &urls, &dest, file).await,
                    };
                    (key, status)
                }
            })
            .collect();

        for (key, status) in join_all(futures).await {
            if let FetchStatus::Downloaded { file } = &status {
                cache.insert(key.clone(), file.clone());
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            summary.outcomes.push((key, status));
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    cache.save()?;
    info!(
        total = packages.len(),
        downloaded = summary.downloaded(),
        cached = summary.cached(),
        failed = summary.failures().len(),
        "license download finished"
    );
    Ok(summary)
}

async fn fetch_one(
    client: &Client,
    key: &str,
    urls: &[String],
    dest: &Path,
    file: String,
) -> FetchStatus {
    for url in urls {
        debug!(package = %key, url = %url, "trying license url");
        match http::download(client, url).await {
            Ok(bytes) => {
                if let Err(e) = tokio::fs::write(dest, &bytes).await {
                    return FetchStatus::Failed {
                        reason: format!("Failed to write {}: {}", dest.display(), e),
                    };
                }
                return FetchStatus::Downloaded { file };
            }
            Err(e) => debug!(package = %key, url = %url, error = %e, "candidate failed"),
        }
    }

    FetchStatus::Failed {
        reason: "License file not found in package".to_string(),
    }
}
