/*============================================================
  Synavera Project: Syn-Slack
  Module: synslack::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Load and default Syn-Slack configuration: repository mirror
    location, package prefix filters, install-log directory,
    and session log placement.

  Security / Safety Notes:
    Configuration is read from operator-controlled paths only;
    values are never executed.

  Dependencies:
    serde + toml for deserialization, dirs for XDG locations.

  Operational Scope:
    Resolved once at startup; CLI flags override file values.

  Revision History:
    2025-03-13 COD  Authored configuration loader.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit defaults over hidden fallbacks
    - Missing optional config is not an error; missing
      requested config is
============================================================*/

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SynslackError};

/// Default repository mirror location.
const DEFAULT_REPO: &str = "/mnt/mirror/slackware/slackware64-15.0";

/// Default package subdirectories considered within the mirror.
const DEFAULT_PREFIXES: [&str; 2] = ["./patches/packages", "./slackware64"];

/// Default local install-log directory.
const DEFAULT_LOCAL: &str = "/var/log/packages";

/// Top-level Syn-Slack configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynslackConfig {
    /// Repository directory; only CHECKSUMS.md5 and FILELIST.TXT are read.
    pub repo: PathBuf,
    /// Package subdirectory prefixes within the repository to consider.
    pub prefixes: Vec<String>,
    /// Directory of package install logs.
    pub local: PathBuf,
    /// Directory receiving session log files; absent means no file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for SynslackConfig {
    fn default() -> Self {
        Self {
            repo: PathBuf::from(DEFAULT_REPO),
            prefixes: DEFAULT_PREFIXES.iter().map(ToString::to_string).collect(),
            local: PathBuf::from(DEFAULT_LOCAL),
            log_dir: dirs::state_dir().map(|dir| dir.join("syn-slack")),
        }
    }
}

impl SynslackConfig {
    /// Load configuration from `path` when given, otherwise from the default
    /// location. A missing file at the default location yields defaults; a
    /// missing explicitly requested file is a configuration error.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        let (config_path, required) = match path {
            Some(explicit) => (explicit.to_path_buf(), true),
            None => match Self::default_path() {
                Some(default) => (default, false),
                None => return Ok(Self::default()),
            },
        };

        let raw = match std::fs::read_to_string(&config_path) {
            Ok(raw) => raw,
            Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(SynslackError::Config(format!(
                    "Failed to read {}: {err}",
                    config_path.display()
                )));
            }
        };

        toml::from_str(&raw).map_err(|err| {
            SynslackError::Config(format!("Failed to parse {}: {err}", config_path.display()))
        })
    }

    /// Default configuration file location under the XDG config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("syn-slack").join("config.toml"))
    }
}
