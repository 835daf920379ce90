use serde::{Deserialize, Serialize};

use crate::manifest::Row;

/// License identifier recorded when a package declares none.
pub const UNKNOWN_LICENSE: &str = "UNKNOWN";

/// One resolved dependency, as written to and read from the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    /// SPDX identifier or expression, or [`UNKNOWN_LICENSE`].
    pub license: String,
    pub license_url: Option<String>,
}

impl Package {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        license: impl Into<String>,
        license_url: Option<String>,
    ) -> Self {
        Package {
            name: name.into(),
            version: version.into(),
            license: license.into(),
            license_url,
        }
    }

    /// Cache and lookup key, `name@version`.
    pub fn key(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    /// Build a package from a manifest row keyed by
    /// [`manifest::KEYS`](crate::manifest::KEYS).
    pub fn from_row(row: &Row) -> Option<Package> {
        let field = |key: &str| row.text(key).map(|v| v.into_owned());

        let name = field("name").filter(|s| !s.is_empty())?;
        let version = field("version").filter(|s| !s.is_empty())?;
        let license = field("license").unwrap_or_default();
        let license_url = field("licenseUrl").filter(|s| !s.is_empty());

        Some(Package {
            name,
            version,
            license,
            license_url,
        })
    }
}

/// A package paired with its downloaded license text, if any.
#[derive(Debug, Clone, Serialize)]
pub struct LicenseEntry {
    #[serde(flatten)]
    pub package: Package,
    pub text: Option<String>,
}

/// How a single license download ended.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchStatus {
    Downloaded { file: String },
    Cached { file: String },
    Failed { reason: String },
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStatus::Downloaded { file } => write!(f, "downloaded ({})", file),
            FetchStatus::Cached { file } => write!(f, "cached ({})", file),
            FetchStatus::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}
