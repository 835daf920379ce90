//! The dependency manifest: a comma-separated file with one record per
//! package, and the streaming tokenizer that reads it back.
//!
//! - [`parser`] — incremental record tokenizer ([`RecordParser`]).
//! - [`reader`] — iterator adapter over any [`std::io::Read`].
//! - [`writer`] — serializer producing the four-column layout.
//!
//! [`load_manifest`] and [`save_manifest`] tie both halves to the
//! [`Package`](crate::models::Package) model.

pub mod error;
pub mod options;
pub mod parser;
pub mod reader;
pub mod row;
pub mod writer;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

pub use error::ParseError;
pub use options::{Headers, ParserOptions, DEFAULT_COMMENT};
pub use parser::{parse_bytes, RecordParser};
pub use reader::EventReader;
pub use row::{Event, Row, Value};
pub use writer::{escape_field, write_manifest, write_record, HEADER};

use crate::models::Package;

/// Row keys used for the manifest columns after header mapping.
pub const KEYS: [&str; 4] = ["name", "version", "license", "licenseUrl"];

/// Tokenizer options for reading a manifest: default format, column titles
/// renamed to [`KEYS`], unknown columns kept under their own title.
pub fn manifest_options() -> ParserOptions {
    ParserOptions::default().map_headers(|header, _| {
        let key = HEADER
            .iter()
            .position(|title| *title == header.trim())
            .map(|i| KEYS[i].to_string());
        Some(key.unwrap_or_else(|| header.to_string()))
    })
}

/// Write `packages` to `path`, creating parent directories.
pub fn save_manifest(path: &Path, packages: &[Package]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_manifest(&mut out, packages)
        .with_context(|| format!("Failed to write manifest {}", path.display()))?;
    debug!(path = %path.display(), packages = packages.len(), "manifest written");
    Ok(())
}

/// Read a manifest back into packages.
///
/// Records without a name or version are skipped with a warning, as are
/// recoverable parse errors. A fatal tokenizer error fails the load.
pub fn load_manifest(path: &Path) -> Result<Vec<Package>> {
    let file = File::open(path).with_context(|| {
        format!(
            "Manifest {} not found; run the `manifest` command first",
            path.display()
        )
    })?;
    read_packages(EventReader::new(file, manifest_options()))
        .with_context(|| format!("Failed to parse manifest {}", path.display()))
}

fn read_packages<R: std::io::Read>(events: EventReader<R>) -> Result<Vec<Package>> {
    let mut packages = Vec::new();

    for (index, event) in events.enumerate() {
        match event? {
            Event::Headers(headers) => debug!(?headers, "manifest headers"),
            Event::Error(e) => warn!(error = %e, "skipping malformed manifest record"),
            Event::Row(row) => match Package::from_row(&row) {
                Some(pkg) => packages.push(pkg),
                None if row.is_empty() => {}
                None => warn!(event = index, "skipping manifest record without name or version"),
            },
        }
    }

    Ok(packages)
}
