/*============================================================
  Synavera Project: Syn-Slack
  Module: synslack::manifest
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Parse Slackware repository manifests. Extracts package
    identity from archive filenames and reads the FILELIST.TXT
    (modification times) and CHECKSUMS.md5 (digests) formats.

  Security / Safety Notes:
    Consumes operator-supplied text streams read-only; no paths
    are opened or written here.

  Dependencies:
    chrono for timestamp parsing.

  Operational Scope:
    Supplies the repository reconciler with path-keyed package
    maps, one per manifest source.

  Revision History:
    2025-03-11 COD  Authored filename identity parser.
    2025-03-12 COD  Added FILELIST.TXT and CHECKSUMS.md5 readers.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Structured parsing with explicit failure modes
    - Silent skip only for lines outside the package universe
    - Verbosity threaded in as a value, never global state
============================================================*/

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::{Result, SynslackError};
use crate::logger::Logger;
use crate::package_info::PackageInfo;

/// Archive suffixes recognised as Slackware packages, in strip order.
pub const SUFFIXES: [&str; 6] = [".tgz", ".txz", ".tbz2", ".tar.gz", ".tar.xz", ".tar.bz2"];

/// Format string for FILELIST.TXT modification stamps.
const FILELIST_STAMP: &str = "%Y-%m-%d %H:%M";

/// Marker line separating the CHECKSUMS.md5 preamble from data records.
const CHECKSUM_HEADER: &str = "MD5 message digest";

/// True when `s` starts with any of `prefixes`.
fn has_any_prefix(s: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| s.starts_with(p.as_str()))
}

/// True when `s` ends with a recognised package archive suffix.
fn has_known_suffix(s: &str) -> bool {
    SUFFIXES.iter().any(|suffix| s.ends_with(suffix))
}

/// Remove recognised archive suffixes from `s`.
///
/// Walks the whole suffix list rather than stopping at the first strip, so a
/// name ending in several stacked suffixes loses each of them.
fn trim_suffixes(mut s: &str) -> &str {
    for suffix in SUFFIXES {
        if let Some(stripped) = s.strip_suffix(suffix) {
            s = stripped;
        }
    }
    s
}

/// Parse a package archive path into its identity record.
///
/// The basename, with archive suffixes removed, splits on `-` into
/// `<name>-<version>-<arch>-<build>`; the name itself may contain dashes.
pub fn parse_package_path(package_path: &str) -> Result<PackageInfo> {
    let base = Path::new(package_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let segments: Vec<&str> = trim_suffixes(base).split('-').collect();
    if segments.len() < 3 {
        return Err(SynslackError::Parse(format!(
            "invalid package name with less than 3 dashes: {package_path}"
        )));
    }

    let name = segments[..segments.len() - 3].join("-");
    let version = segments[segments.len() - 3];
    let arch = segments[segments.len() - 2];
    let build = segments[segments.len() - 1];

    if name.is_empty() || version.is_empty() || arch.is_empty() || build.is_empty() {
        return Err(SynslackError::Parse(format!(
            "empty fields in package: {package_path}"
        )));
    }

    Ok(PackageInfo {
        name,
        version: version.to_string(),
        arch: arch.to_string(),
        build: build.to_string(),
        mod_time: None,
        checksum: None,
        path: package_path.to_string(),
    })
}

/// Read FILELIST.TXT-style contents, extracting package paths and their
/// modification times. Only paths starting with one of `prefixes` are
/// considered (an empty list accepts everything).
pub fn read_timestamps<R: BufRead>(
    filelist: R,
    prefixes: &[String],
    logger: &Logger,
) -> Result<BTreeMap<String, PackageInfo>> {
    let mut out = BTreeMap::new();

    for line in filelist.lines() {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 8 {
            logger.debug(
                "FILELIST",
                format!("skipping line with field count not 8: {line}"),
            );
            continue;
        }

        // ignore non package lines (asc, txt, etc.)
        let path = fields[7];
        if !has_known_suffix(path) {
            logger.debug(
                "FILELIST",
                format!("skipping line with no matching suffix: {line}"),
            );
            continue;
        }

        if !prefixes.is_empty() && !has_any_prefix(path, prefixes) {
            logger.debug(
                "FILELIST",
                format!("skipping line with no matching prefix: {line}"),
            );
            continue;
        }

        if out.contains_key(path) {
            return Err(SynslackError::DuplicateEntry {
                path: path.to_string(),
            });
        }

        let mut info = parse_package_path(path)?;

        let raw_stamp = format!("{} {}", fields[5], fields[6]);
        let stamp = NaiveDateTime::parse_from_str(&raw_stamp, FILELIST_STAMP)
            .map_err(|err| SynslackError::Timestamp(format!("`{raw_stamp}`: {err}")))?;
        info.mod_time = Some(stamp.and_utc());

        out.insert(path.to_string(), info);
    }

    Ok(out)
}

/// Read CHECKSUMS.md5-style contents, extracting package paths and their MD5
/// digests. Everything up to and including the header marker line is
/// preamble and skipped unconditionally.
pub fn read_checksums<R: BufRead>(
    checksums: R,
    prefixes: &[String],
    logger: &Logger,
) -> Result<BTreeMap<String, PackageInfo>> {
    let mut lines = checksums.lines();
    for line in lines.by_ref() {
        if line?.starts_with(CHECKSUM_HEADER) {
            break;
        }
    }

    let mut out = BTreeMap::new();
    for line in lines {
        let line = line?;
        let fields: Vec<&str> = line.split("  ").collect();
        if fields.len() != 2 {
            return Err(SynslackError::Format(format!(
                "invalid CHECKSUMS.md5 line: {line}"
            )));
        }

        let (digest, path) = (fields[0], fields[1]);
        if !prefixes.is_empty() && !has_any_prefix(path, prefixes) {
            logger.debug(
                "CHECKSUMS",
                format!("skipping line with no matching prefix: {line}"),
            );
            continue;
        }

        // ignore non package lines (asc, txt, etc.)
        if !has_known_suffix(path) {
            logger.debug(
                "CHECKSUMS",
                format!("skipping line with no matching suffix: {line}"),
            );
            continue;
        }

        let mut info = parse_package_path(path)?;
        info.checksum = Some(digest.to_string());

        out.insert(path.to_string(), info);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn quiet_logger() -> Logger {
        Logger::new(None, false).unwrap()
    }

    fn no_prefixes() -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn parse_splits_trailing_segments() {
        let info = parse_package_path("./slackware64/a/pkgtools-14.2-noarch-10.tgz").unwrap();
        assert_eq!(info.name, "pkgtools");
        assert_eq!(info.version, "14.2");
        assert_eq!(info.arch, "noarch");
        assert_eq!(info.build, "10");
        assert_eq!(info.path, "./slackware64/a/pkgtools-14.2-noarch-10.tgz");
        assert_eq!(info.mod_time, None);
        assert_eq!(info.checksum, None);
    }

    #[test]
    fn parse_keeps_dashes_inside_name() {
        let info = parse_package_path("util-linux-2.27.1-x86_64-1.txz").unwrap();
        assert_eq!(info.name, "util-linux");
        assert_eq!(info.version, "2.27.1");
    }

    #[test]
    fn parse_accepts_every_known_suffix() {
        for suffix in SUFFIXES {
            let info = parse_package_path(&format!("foo-1.0-x86_64-1{suffix}")).unwrap();
            assert_eq!(info.name, "foo", "suffix {suffix}");
            assert_eq!(info.build, "1", "suffix {suffix}");
        }
    }

    #[test]
    fn parse_strips_stacked_suffixes() {
        // .tgz is stripped first, exposing .tar.gz to the later pass.
        let info = parse_package_path("foo-1.0-x86_64-1.tar.gz.tgz").unwrap();
        assert_eq!(info.build, "1");
    }

    #[test]
    fn parse_rejects_too_few_segments() {
        let err = parse_package_path("foo-1.0.tgz").unwrap_err();
        assert!(matches!(err, SynslackError::Parse(_)));
    }

    #[test]
    fn parse_rejects_missing_name() {
        // exactly three segments leaves nothing for the name
        let err = parse_package_path("1.0-x86_64-1.tgz").unwrap_err();
        assert!(matches!(err, SynslackError::Parse(_)));
    }

    #[test]
    fn parse_rejects_empty_segment() {
        let err = parse_package_path("foo--x86_64-1.tgz").unwrap_err();
        assert!(matches!(err, SynslackError::Parse(_)));
    }

    const FILELIST: &str = "\
drwxr-xr-x  3 root root     4096 2016-06-30 18:14 ./slackware64/a
-rw-r--r--  1 root root      724 2016-06-30 18:14 ./slackware64/a/pkgtools-14.2-noarch-10.txt
-rw-r--r--  1 root root   423936 2016-06-30 18:14 ./slackware64/a/pkgtools-14.2-noarch-10.tgz
-rw-r--r--  1 root root  1234567 2016-07-01 09:30 ./slackware64/ap/vim-7.4.1938-x86_64-1.txz
";

    #[test]
    fn timestamps_reads_package_lines_only() {
        let out = read_timestamps(FILELIST.as_bytes(), &no_prefixes(), &quiet_logger()).unwrap();
        assert_eq!(out.len(), 2);
        let info = &out["./slackware64/a/pkgtools-14.2-noarch-10.tgz"];
        assert_eq!(info.name, "pkgtools");
        assert_eq!(
            info.mod_time,
            Some(Utc.with_ymd_and_hms(2016, 6, 30, 18, 14, 0).unwrap())
        );
        assert_eq!(info.checksum, None);
    }

    #[test]
    fn timestamps_applies_prefix_filter() {
        let prefixes = vec!["./slackware64/ap".to_string()];
        let out = read_timestamps(FILELIST.as_bytes(), &prefixes, &quiet_logger()).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out.contains_key("./slackware64/ap/vim-7.4.1938-x86_64-1.txz"));
    }

    #[test]
    fn timestamps_rejects_duplicate_paths() {
        let doubled = format!("{FILELIST}{FILELIST}");
        let err =
            read_timestamps(doubled.as_bytes(), &no_prefixes(), &quiet_logger()).unwrap_err();
        assert!(matches!(err, SynslackError::DuplicateEntry { .. }));
    }

    #[test]
    fn timestamps_rejects_malformed_stamp() {
        let input =
            "-rw-r--r--  1 root root  1 2016-13-45 99:99 ./slackware64/a/foo-1.0-x86_64-1.tgz\n";
        let err = read_timestamps(input.as_bytes(), &no_prefixes(), &quiet_logger()).unwrap_err();
        assert!(matches!(err, SynslackError::Timestamp(_)));
    }

    #[test]
    fn timestamps_propagates_identity_parse_failure() {
        let input = "-rw-r--r--  1 root root  1 2016-06-30 18:14 ./slackware64/a/broken.tgz\n";
        let err = read_timestamps(input.as_bytes(), &no_prefixes(), &quiet_logger()).unwrap_err();
        assert!(matches!(err, SynslackError::Parse(_)));
    }

    const CHECKSUMS: &str = "\
These are the MD5 message digests for the files in this directory.

MD5 message digest                Filename
d41d8cd98f00b204e9800998ecf8427e  ./slackware64/a/pkgtools-14.2-noarch-10.txt
0a9dc2f64a41b9e4a2b2b44e1e1ba55b  ./slackware64/a/pkgtools-14.2-noarch-10.tgz
9c0f2b7b8f3d3f2e1d0c9b8a7f6e5d4c  ./slackware64/ap/vim-7.4.1938-x86_64-1.txz
";

    #[test]
    fn checksums_skips_preamble_and_non_packages() {
        let out = read_checksums(CHECKSUMS.as_bytes(), &no_prefixes(), &quiet_logger()).unwrap();
        assert_eq!(out.len(), 2);
        let info = &out["./slackware64/a/pkgtools-14.2-noarch-10.tgz"];
        assert_eq!(
            info.checksum.as_deref(),
            Some("0a9dc2f64a41b9e4a2b2b44e1e1ba55b")
        );
        assert_eq!(info.mod_time, None);
    }

    #[test]
    fn checksums_preamble_is_ignored_even_when_malformed() {
        // a single-field line before the header must not trip the format check
        let input = "garbage preamble line\nMD5 message digest\n\
0a9dc2f64a41b9e4a2b2b44e1e1ba55b  ./slackware64/a/pkgtools-14.2-noarch-10.tgz\n";
        let out = read_checksums(input.as_bytes(), &no_prefixes(), &quiet_logger()).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn checksums_rejects_bad_field_count() {
        let input = "MD5 message digest\nnot a data line\n";
        let err = read_checksums(input.as_bytes(), &no_prefixes(), &quiet_logger()).unwrap_err();
        assert!(matches!(err, SynslackError::Format(_)));
    }

    #[test]
    fn checksums_applies_prefix_filter() {
        let prefixes = vec!["./slackware64/a/".to_string()];
        let out = read_checksums(CHECKSUMS.as_bytes(), &prefixes, &quiet_logger()).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out.contains_key("./slackware64/a/pkgtools-14.2-noarch-10.tgz"));
    }
}
