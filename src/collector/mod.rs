//! Dependency collectors: turn a package manager's view of the installed
//! tree into a deduplicated, sorted list of [`Package`]s.

use std::path::Path;

use anyhow::Result;

use crate::models::Package;

pub mod npm;

pub trait Collector {
    fn collect(&self, path: &Path) -> Result<Vec<Package>>;
}
