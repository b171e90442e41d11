/*============================================================
  Synavera Project: Syn-Slack
  Module: synslack::package_info
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Shared structures describing package identity derived from
    Slackware archive filenames, plus the field-merge rules used
    when reconciling manifest sources.

  Security / Safety Notes:
    Pure data containers; no I/O performed in this module.

  Dependencies:
    chrono for modification timestamps, serde for JSON output.

  Operational Scope:
    Used by the manifest readers, the repository reconciler, the
    local log reader, and upgrade matching.

  Revision History:
    2025-03-11 COD  Introduced shared PackageInfo type.
    2025-03-19 COD  Replaced per-field merge blocks with a
                    single coalesce-or-conflict helper.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Clear data contracts between modules
    - Merge produces new records, never mutates in place
    - Serializable structures for machine-readable output
============================================================*/

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Result, SynslackError};

/// Identity and provenance of one package archive.
///
/// `name`, `version`, `arch`, and `build` are non-empty once a record has
/// been parsed from a filename. `mod_time`, `checksum`, and `path` are
/// populated depending on which manifest the record came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub arch: String,
    pub build: String,
    pub mod_time: Option<DateTime<Utc>>,
    pub checksum: Option<String>,
    pub path: String,
}

impl PackageInfo {
    /// Merge two records describing the same package archive.
    ///
    /// For every field: a value present on exactly one side is taken, equal
    /// values are taken as-is, and two differing present values fail with a
    /// conflict naming the field and both values.
    pub fn merge(&self, other: &PackageInfo) -> Result<PackageInfo> {
        Ok(PackageInfo {
            name: merge_str("Name", &self.name, &other.name)?,
            version: merge_str("Version", &self.version, &other.version)?,
            arch: merge_str("Arch", &self.arch, &other.arch)?,
            build: merge_str("Build", &self.build, &other.build)?,
            mod_time: coalesce("ModTime", self.mod_time, other.mod_time)?,
            checksum: coalesce(
                "CheckSum",
                self.checksum.as_deref(),
                other.checksum.as_deref(),
            )?
            .map(str::to_owned),
            path: merge_str("Path", &self.path, &other.path)?,
        })
    }

    /// Modification time as unix seconds, zero when absent.
    pub fn unix_mod_time(&self) -> i64 {
        self.mod_time.map_or(0, |t| t.timestamp())
    }
}

impl fmt::Display for PackageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.name,
            self.version,
            self.arch,
            self.build,
            self.unix_mod_time(),
            self.path
        )
    }
}

/// Pairs a locally installed package with its repository counterpart.
#[derive(Debug, Clone, Serialize)]
pub struct UpgradeInfo {
    pub local: PackageInfo,
    pub repo: PackageInfo,
}

impl fmt::Display for UpgradeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.local, self.repo)
    }
}

/// Resolve two optional values for `field` into one, failing when both are
/// present and disagree. The absence sentinel is `None`; string fields map
/// "" to `None` before calling in.
fn coalesce<T>(field: &'static str, a: Option<T>, b: Option<T>) -> Result<Option<T>>
where
    T: PartialEq + fmt::Display,
{
    match (a, b) {
        (Some(x), None) => Ok(Some(x)),
        (None, Some(y)) => Ok(Some(y)),
        (None, None) => Ok(None),
        (Some(x), Some(y)) if x == y => Ok(Some(x)),
        (Some(x), Some(y)) => Err(SynslackError::Conflict {
            field,
            left: x.to_string(),
            right: y.to_string(),
        }),
    }
}

fn merge_str(field: &'static str, a: &str, b: &str) -> Result<String> {
    Ok(coalesce(field, present(a), present(b))?
        .map(str::to_owned)
        .unwrap_or_default())
}

fn present(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
