use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "license-harvest",
    about = "Collect third-party licenses into a manifest, download their texts and render a report",
    version
)]
pub struct Cli {
    /// Tool config file [default: ./.license-harvest/config.toml, fallback ~/.config/license-harvest/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,

    /// Log output format
    #[arg(long, global = true, default_value = "text", value_name = "FORMAT")]
    pub log_format: LogFormat,

    /// Only print summary lines
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Collect dependencies and write the license manifest
    Manifest(ManifestArgs),
    /// Download license texts for every manifest row
    Download(DownloadArgs),
    /// Render the HTML license report
    Report(ProjectArgs),
    /// Run manifest, download and report in sequence
    All(AllArgs),
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Project path
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct ManifestArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// License overrides file [default: first of license-overrides.yml, .github/license-overrides.yml, licenses/overrides.yml]
    #[arg(long, value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Read a pre-captured `npm list --json` output instead of running npm
    #[arg(long, value_name = "FILE")]
    pub npm_json: Option<PathBuf>,

    /// Only include production dependencies
    #[arg(long, env = "PRODUCTION_ONLY")]
    pub production_only: bool,

    /// Exit with status 1 when any package has an unknown license
    #[arg(long, env = "FAIL_ON_UNKNOWN")]
    pub fail_on_unknown: bool,

    /// Exit with status 1 when any package has a copyleft license
    #[arg(long, env = "FAIL_ON_COPYLEFT")]
    pub fail_on_copyleft: bool,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// License overrides file
    #[arg(long, value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Fail when any license text could not be downloaded (true/false)
    #[arg(long, env = "FAIL_ON_MISSING_LICENSES", value_name = "BOOL")]
    pub fail_on_missing: Option<bool>,

    /// Base URL of the package CDN
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct AllArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Fail when any license text could not be downloaded (true/false)
    #[arg(long, env = "FAIL_ON_MISSING_LICENSES", value_name = "BOOL")]
    pub fail_on_missing: Option<bool>,

    /// Base URL of the package CDN
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest_command() {
        let cli = Cli::try_parse_from([
            "license-harvest",
            "--log-format",
            "json",
            "manifest",
            "web",
            "--fail-on-copyleft",
            "--npm-json",
            "tree.json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Command::Manifest(args) => {
                assert_eq!(args.project.path, PathBuf::from("web"));
                assert!(args.fail_on_copyleft);
                assert_eq!(args.npm_json, Some(PathBuf::from("tree.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_download_defaults() {
        let cli = Cli::try_parse_from(["license-harvest", "download", "-q"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.log_level, "info");
        match cli.command {
            Command::Download(args) => {
                assert_eq!(args.project.path, PathBuf::from("."));
                assert!(args.base_url.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_fail_on_missing_accepts_false() {
        let cli = Cli::try_parse_from([
            "license-harvest",
            "all",
            "--fail-on-missing",
            "false",
        ])
        .unwrap();
        match cli.command {
            Command::All(args) => assert_eq!(args.fail_on_missing, Some(false)),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
