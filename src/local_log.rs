/*============================================================
  Synavera Project: Syn-Slack
  Module: synslack::local_log
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Enumerate the local package install-log directory and turn
    each entry into a package identity record.

  Security / Safety Notes:
    Reads directory metadata only; log file contents are never
    opened.

  Dependencies:
    std::fs for the listing, chrono for timestamps.

  Operational Scope:
    Backs the `list` operation and supplies the local side of
    upgrade matching.

  Revision History:
    2025-03-12 COD  Authored install-log reader.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic, name-sorted enumeration
    - Hard failure on unparseable log entries
============================================================*/

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{Result, SynslackError};
use crate::manifest::parse_package_path;
use crate::package_info::PackageInfo;

/// Read a local install-log directory (non-recursive), returning one record
/// per entry in name-sorted order. Entry names parse like package archive
/// filenames without a suffix; the filesystem modification time of each log
/// entry is carried as the package's modification time.
pub fn read_package_log(package_log: &Path) -> Result<Vec<PackageInfo>> {
    let entries = fs::read_dir(package_log).map_err(|err| {
        SynslackError::Filesystem(format!("Failed to read {}: {err}", package_log.display()))
    })?;

    let mut names: Vec<(String, DateTime<Utc>)> = Vec::new();
    for entry in entries {
        let entry = entry?;
        let metadata = entry.metadata()?;
        let modified = metadata.modified().map_err(|err| {
            SynslackError::Filesystem(format!(
                "No modification time for {}: {err}",
                entry.path().display()
            ))
        })?;
        names.push((
            entry.file_name().to_string_lossy().into_owned(),
            DateTime::<Utc>::from(modified),
        ));
    }

    // sort so we get packages alphabetically
    names.sort_by(|a, b| a.0.cmp(&b.0));

    let mut pkgs = Vec::with_capacity(names.len());
    for (name, modified) in names {
        let mut info = parse_package_path(&name)?;
        info.mod_time = Some(modified);
        pkgs.push(info);
    }

    Ok(pkgs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn reads_entries_name_sorted_with_mod_times() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("zsh-5.2-x86_64-1")).unwrap();
        File::create(dir.path().join("bash-4.3.046-x86_64-1")).unwrap();
        File::create(dir.path().join("util-linux-2.27.1-x86_64-1")).unwrap();

        let pkgs = read_package_log(dir.path()).unwrap();
        let names: Vec<&str> = pkgs.iter().map(|info| info.name.as_str()).collect();
        assert_eq!(names, vec!["bash", "util-linux", "zsh"]);
        assert!(pkgs.iter().all(|info| info.mod_time.is_some()));
        assert!(pkgs.iter().all(|info| info.checksum.is_none()));
    }

    #[test]
    fn keeps_entry_name_as_path() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("bash-4.3.046-x86_64-1")).unwrap();

        let pkgs = read_package_log(dir.path()).unwrap();
        assert_eq!(pkgs[0].path, "bash-4.3.046-x86_64-1");
        assert_eq!(pkgs[0].version, "4.3.046");
    }

    #[test]
    fn unparseable_entry_fails_the_whole_read() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("bash-4.3.046-x86_64-1")).unwrap();
        File::create(dir.path().join("README")).unwrap();

        let err = read_package_log(dir.path()).unwrap_err();
        assert!(matches!(err, SynslackError::Parse(_)));
    }

    #[test]
    fn missing_directory_is_a_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");
        let err = read_package_log(&missing).unwrap_err();
        assert!(matches!(err, SynslackError::Filesystem(_)));
    }
}
