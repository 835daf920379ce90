use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::{info, warn};

use license_harvest::cli::{Cli, Command, ManifestArgs};
use license_harvest::collector::npm::NpmCollector;
use license_harvest::collector::Collector;
use license_harvest::config::{load_config, Config, PathsConfig};
use license_harvest::fetcher::{fetch_licenses, unpkg, FetchOptions};
use license_harvest::license::LicenseSummary;
use license_harvest::logging::init_tracing;
use license_harvest::manifest::{load_manifest, save_manifest};
use license_harvest::overrides::load_overrides;
use license_harvest::report;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format)?;

    let project = match &cli.command {
        Command::Manifest(args) => &args.project.path,
        Command::Download(args) => &args.project.path,
        Command::Report(args) => &args.path,
        Command::All(args) => &args.manifest.project.path,
    };
    let project = project.canonicalize().unwrap_or_else(|_| project.clone());

    let mut config = load_config(&project, cli.config.as_deref())?;
    let paths = config.paths.resolve(&project);

    let ok = match &cli.command {
        Command::Manifest(args) => {
            merge_manifest_flags(&mut config, args);
            run_manifest(&project, &paths, &config, args, cli.quiet)?
        }
        Command::Download(args) => {
            if let Some(fail) = args.fail_on_missing {
                config.policy.fail_on_missing = fail;
            }
            run_download(
                &project,
                &paths,
                &config,
                args.overrides.as_deref(),
                args.base_url.as_deref(),
                cli.quiet,
            )
            .await?
        }
        Command::Report(_) => {
            run_report(&project, &paths, cli.quiet)?;
            true
        }
        Command::All(args) => {
            merge_manifest_flags(&mut config, &args.manifest);
            if let Some(fail) = args.fail_on_missing {
                config.policy.fail_on_missing = fail;
            }
            let manifest_ok = run_manifest(&project, &paths, &config, &args.manifest, cli.quiet)?;
            let download_ok = run_download(
                &project,
                &paths,
                &config,
                args.manifest.overrides.as_deref(),
                args.base_url.as_deref(),
                cli.quiet,
            )
            .await?;
            run_report(&project, &paths, cli.quiet)?;
            manifest_ok && download_ok
        }
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}

/// CLI flags can only switch policies on; the config file stays the baseline.
fn merge_manifest_flags(config: &mut Config, args: &ManifestArgs) {
    config.policy.production_only |= args.production_only;
    config.policy.fail_on_unknown |= args.fail_on_unknown;
    config.policy.fail_on_copyleft |= args.fail_on_copyleft;
}

/// Collect, write the manifest, print the summary. Returns `false` when a
/// fail-on policy is violated.
fn run_manifest(
    project: &Path,
    paths: &PathsConfig,
    config: &Config,
    args: &ManifestArgs,
    quiet: bool,
) -> Result<bool> {
    let overrides = load_overrides(project, args.overrides.as_deref());
    let collector = NpmCollector::new(&overrides)
        .production_only(config.policy.production_only)
        .npm_json(args.npm_json.clone());

    let packages = collector.collect(project)?;
    save_manifest(&paths.manifest, &packages)?;
    info!(path = %paths.manifest.display(), packages = packages.len(), "manifest written");

    let summary = LicenseSummary::build(&packages)?;
    report::terminal::render_summary(&summary, packages.len(), quiet);

    let mut ok = true;
    if config.policy.fail_on_unknown && !summary.unknown.is_empty() {
        eprintln!(
            " {} {} packages have unknown licenses",
            "[ERROR]".red().bold(),
            summary.unknown.len()
        );
        ok = false;
    }
    if config.policy.fail_on_copyleft && !summary.copyleft.is_empty() {
        eprintln!(
            " {} {} packages have copyleft licenses",
            "[ERROR]".red().bold(),
            summary.copyleft.len()
        );
        ok = false;
    }
    Ok(ok)
}

async fn run_download(
    project: &Path,
    paths: &PathsConfig,
    config: &Config,
    overrides_path: Option<&Path>,
    base_url: Option<&str>,
    quiet: bool,
) -> Result<bool> {
    let packages = load_manifest(&paths.manifest)?;
    let overrides = load_overrides(project, overrides_path);
    let opts = FetchOptions {
        texts_dir: paths.texts.clone(),
        cache_path: paths.cache.clone(),
        timeout: Duration::from_secs(config.download.timeout_secs),
        concurrency: config.download.concurrency,
        base_url: base_url.unwrap_or(unpkg::DEFAULT_BASE_URL).to_string(),
        quiet,
    };

    let summary = fetch_licenses(&packages, &overrides, &opts).await?;
    report::terminal::render_fetch_summary(&summary, quiet);

    let failed = summary.failures().len();
    if failed > 0 {
        if config.policy.fail_on_missing {
            return Ok(false);
        }
        warn!(failed, "continuing with missing license texts");
    }
    Ok(true)
}

fn run_report(project: &Path, paths: &PathsConfig, quiet: bool) -> Result<()> {
    let count =
        report::html::write_report(project, &paths.manifest, &paths.texts, &paths.report)?;
    if !quiet {
        println!(
            " {} Report with {} packages written to {}",
            "✓".green(),
            count,
            paths.report.display()
        );
    }
    Ok(())
}
