use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::fetcher::FetchSummary;
use crate::license::LicenseSummary;
use crate::models::Package;

/// Print the license summary after the manifest has been written.
pub fn render_summary(summary: &LicenseSummary<'_>, total: usize, quiet: bool) {
    if quiet {
        println!(
            "Packages: {}  Licenses: {}  Unknown: {}  Copyleft: {}",
            total,
            summary.unique_licenses(),
            summary.unknown.len().to_string().yellow(),
            summary.copyleft.len().to_string().red(),
        );
        return;
    }

    println!(
        "\n {} v{}\n",
        "license-harvest".bold(),
        env!("CARGO_PKG_VERSION")
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Packages").add_attribute(Attribute::Bold),
        ]);
    for (license, count) in &summary.counts {
        table.add_row(vec![
            Cell::new(license),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}", table);
    println!(" Total: {} packages, {} distinct licenses\n", total, summary.unique_licenses());

    if summary.unknown.is_empty() {
        println!(" {} No unknown licenses detected.", "✓".green());
    } else {
        println!(" {} Unknown licenses detected:\n", "[WARN]".yellow().bold());
        render_packages(&summary.unknown, Color::Yellow);
        println!(" Add license information for these packages to the overrides file.\n");
    }

    if summary.copyleft.is_empty() {
        println!(" {} No copyleft licenses detected.", "✓".green());
    } else {
        println!(" {} Copyleft licenses detected:\n", "[WARN]".yellow().bold());
        render_packages(&summary.copyleft, Color::Red);
        println!(" Review these licenses carefully to ensure compliance.\n");
    }
}

fn render_packages(packages: &[&Package], license_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
        ]);

    for pkg in packages {
        table.add_row(vec![
            Cell::new(&pkg.name),
            Cell::new(&pkg.version),
            Cell::new(&pkg.license).fg(license_color),
        ]);
    }

    println!("{}\n", table);
}

/// Print the outcome of a download run.
pub fn render_fetch_summary(summary: &FetchSummary, quiet: bool) {
    let failures = summary.failures();

    println!(
        "\n {} Processed {} packages  Downloaded: {}  Cached: {}  Failed: {}",
        "✓".green(),
        summary.outcomes.len(),
        summary.downloaded(),
        summary.cached(),
        failures.len().to_string().red(),
    );

    if quiet || failures.is_empty() {
        return;
    }

    println!("\n {} Failed to download licenses:\n", "[ERROR]".red().bold());
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Package").add_attribute(Attribute::Bold),
            Cell::new("Reason").add_attribute(Attribute::Bold),
        ]);
    for (key, reason) in &failures {
        table.add_row(vec![Cell::new(key), Cell::new(reason).fg(Color::Red)]);
    }
    println!("{}\n", table);

    println!(" To fix these failures:");
    println!("   1. Add a licenseUrl override to license-overrides.yml");
    println!("   2. Or ask the package maintainers to publish a license file");
    println!("   3. Or set fail_on_missing = false to allow missing licenses");
}
