//! License policy checks over the collected packages.
//!
//! - Unknown: the license field is empty or the `UNKNOWN` sentinel.
//! - Copyleft: the identifier mentions one of the reciprocal license
//!   families (GPL, AGPL, LGPL, MPL, EPL, CDDL, CPL).

use std::collections::HashMap;

use anyhow::Result;
use regex::Regex;

use crate::models::{Package, UNKNOWN_LICENSE};

const COPYLEFT_PATTERN: &str = r"(?i)GPL|AGPL|LGPL|MPL|EPL|CDDL|CPL";

pub fn is_unknown(license: &str) -> bool {
    let trimmed = license.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN_LICENSE)
}

/// Aggregated view of the licenses in a dependency set.
#[derive(Debug, Default)]
pub struct LicenseSummary<'a> {
    /// `(license, count)`, most frequent first; ties in name order.
    pub counts: Vec<(String, usize)>,
    pub unknown: Vec<&'a Package>,
    pub copyleft: Vec<&'a Package>,
}

impl<'a> LicenseSummary<'a> {
    pub fn build(packages: &'a [Package]) -> Result<Self> {
        let copyleft_re = Regex::new(COPYLEFT_PATTERN)?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut unknown = Vec::new();
        let mut copyleft = Vec::new();

        for pkg in packages {
            *counts.entry(pkg.license.as_str()).or_insert(0) += 1;
            if is_unknown(&pkg.license) {
                unknown.push(pkg);
            }
            if copyleft_re.is_match(&pkg.license) {
                copyleft.push(pkg);
            }
        }

        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(license, n)| (license.to_string(), n))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(LicenseSummary {
            counts,
            unknown,
            copyleft,
        })
    }

    pub fn unique_licenses(&self) -> usize {
        self.counts.len()
    }
}
