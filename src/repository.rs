/*============================================================
  Synavera Project: Syn-Slack
  Module: synslack::repository
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Reconcile the FILELIST.TXT and CHECKSUMS.md5 views of a
    repository into one authoritative record per package name.

  Security / Safety Notes:
    Opens the two manifest files read-only from an operator
    supplied repository directory.

  Dependencies:
    Manifest readers and PackageInfo merge rules.

  Operational Scope:
    Backs the `available` operation and supplies the repository
    side of upgrade matching.

  Revision History:
    2025-03-12 COD  Authored reconciliation pass.
    2025-03-19 COD  Deterministic tie-breaks via sorted paths.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Hard failure on inconsistent manifest sources
    - Deterministic ordering for reproducible output
    - One record per package name, newest build retained
============================================================*/

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Result, SynslackError};
use crate::logger::Logger;
use crate::manifest::{read_checksums, read_timestamps};
use crate::package_info::PackageInfo;

/// Timestamp manifest filename inside a repository mirror.
const FILELIST_NAME: &str = "FILELIST.TXT";

/// Checksum manifest filename inside a repository mirror.
const CHECKSUMS_NAME: &str = "CHECKSUMS.md5";

/// Read a repository directory's manifests and reconcile them into one
/// name-sorted sequence of packages, one entry per name.
pub fn read_repository(
    repo: &Path,
    prefixes: &[String],
    logger: &Logger,
) -> Result<Vec<PackageInfo>> {
    let filelist_path = repo.join(FILELIST_NAME);
    let filelist = File::open(&filelist_path).map_err(|err| {
        SynslackError::Filesystem(format!("Failed to open {}: {err}", filelist_path.display()))
    })?;
    let timestamps = read_timestamps(BufReader::new(filelist), prefixes, logger)?;

    let checksums_path = repo.join(CHECKSUMS_NAME);
    let checksums = File::open(&checksums_path).map_err(|err| {
        SynslackError::Filesystem(format!(
            "Failed to open {}: {err}",
            checksums_path.display()
        ))
    })?;
    let checksums = read_checksums(BufReader::new(checksums), prefixes, logger)?;

    reconcile(&timestamps, &checksums)
}

/// Merge the two path-keyed manifest maps, keeping the newest entry per
/// package name.
///
/// Every checksummed path must also appear in the timestamp map; the
/// reverse is not required, since FILELIST.TXT lists plenty of files that
/// are not packages at all. Paths are visited in sorted order so that
/// equal-timestamp ties resolve to the same record on every run.
pub fn reconcile(
    timestamps: &BTreeMap<String, PackageInfo>,
    checksums: &BTreeMap<String, PackageInfo>,
) -> Result<Vec<PackageInfo>> {
    let mut newest: BTreeMap<String, PackageInfo> = BTreeMap::new();

    for (path, checksum_info) in checksums {
        let timestamp_info = timestamps
            .get(path)
            .ok_or_else(|| SynslackError::Consistency { path: path.clone() })?;

        let merged = checksum_info.merge(timestamp_info)?;

        match newest.get(&merged.name) {
            Some(current) if current.mod_time >= merged.mod_time => {}
            _ => {
                newest.insert(merged.name.clone(), merged);
            }
        }
    }

    Ok(newest.into_values().collect())
}
