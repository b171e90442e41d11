/*============================================================
  Synavera Project: Syn-Slack
  Module: synslack::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Centralise Syn-Slack error types to provide consistent
    diagnostics and exit semantics.

  Security / Safety Notes:
    Error contexts expose repository paths and package file
    names only; no credentials or host secrets are carried.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Used across modules to propagate manifest, filesystem, and
    reconciliation failures and consolidate exit codes for the
    binary entry point.

  Revision History:
    2025-03-11 COD  Established shared error definitions.
    2025-03-19 COD  Added reconciliation conflict taxonomy.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - No silent failure paths
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::process::ExitCode;

use thiserror::Error;

/// Result alias for Syn-Slack operations.
pub type Result<T> = std::result::Result<T, SynslackError>;

/// Enumerates high-level error domains surfaced by Syn-Slack.
#[derive(Debug, Error)]
pub enum SynslackError {
    #[error("Package name: {0}")]
    Parse(String),
    #[error("Manifest format: {0}")]
    Format(String),
    #[error("Timestamp: {0}")]
    Timestamp(String),
    #[error("Duplicate entry in filelist: {path}")]
    DuplicateEntry { path: String },
    #[error("Package in checksums not found in timestamps: {path}")]
    Consistency { path: String },
    #[error("{field} conflict: a: {left} b: {right}")]
    Conflict {
        field: &'static str,
        left: String,
        right: String,
    },
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Serialization: {0}")]
    Serialization(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SynslackError {
    /// Map error category to a deterministic exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            SynslackError::Parse(_) => ExitCode::from(10),
            SynslackError::Format(_) => ExitCode::from(11),
            SynslackError::Timestamp(_) => ExitCode::from(12),
            SynslackError::DuplicateEntry { .. } => ExitCode::from(13),
            SynslackError::Consistency { .. } => ExitCode::from(14),
            SynslackError::Conflict { .. } => ExitCode::from(15),
            SynslackError::Config(_) => ExitCode::from(20),
            SynslackError::Serialization(_) => ExitCode::from(31),
            SynslackError::Filesystem(_) => ExitCode::from(40),
            SynslackError::Io(_) => ExitCode::from(41),
        }
    }
}
