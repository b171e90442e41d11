/*============================================================
  Synavera Project: Syn-Slack
  Module: synslack::main
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for Syn-Slack. Reconciles Slackware repository
    manifests against the local install log and emits available,
    installed, or upgradeable package listings.

  Security / Safety Notes:
    Operates within user privileges. Reads the repository
    mirror and install-log directories only; nothing is
    downloaded or installed.

  Dependencies:
    clap for CLI parsing, chrono for session stamps.

  Operational Scope:
    Invoked by operators directly or from mirror-sync cron
    wrappers needing upgrade reports.

  Revision History:
    2025-03-13 COD  Authored Syn-Slack runtime.
    2025-03-19 COD  Added JSON rendering mode.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

mod config;
mod error;
mod local_log;
mod logger;
mod manifest;
mod package_info;
mod repository;
mod upgrade;

use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;

use config::SynslackConfig;
use error::{Result, SynslackError};
use local_log::read_package_log;
use logger::Logger;
use repository::read_repository;
use upgrade::match_upgrades;

const OUTPUT_HELP: &str = "\
Output format:
For `available` and `list` the output is a tab-separated list of
name, version, arch, build, unix time of modification, file path.

For `upgrade` the output is similar, only that the first six fields
describe the local package and the last six fields the repository
package.";

/// Command-line arguments for Syn-Slack.
#[derive(Debug, Parser)]
#[command(
    name = "synslack",
    version,
    author = "Synavera Systems",
    about = "Slackware repository inventory and upgrade scanner",
    after_help = OUTPUT_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Override configuration file path.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Repository directory (only CHECKSUMS.md5 and FILELIST.TXT are read).
    #[arg(long, value_name = "PATH", global = true)]
    repo: Option<PathBuf>,
    /// Package subdirectory in the repository to consider; repeatable.
    #[arg(long = "prefix", value_name = "PREFIX", action = ArgAction::Append, global = true)]
    prefixes: Vec<String>,
    /// Directory of package install logs.
    #[arg(long, value_name = "PATH", global = true)]
    local: Option<PathBuf>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH", global = true)]
    log: Option<PathBuf>,
    /// Emit records as pretty JSON instead of tab-separated lines.
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    json: bool,
    /// Enable verbose logging to stderr.
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    verbose: bool,
}

/// Operation selection.
#[derive(Debug, Subcommand)]
enum Command {
    /// List repository packages.
    Available,
    /// List installed packages.
    List,
    /// List upgradeable packages.
    Upgrade,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("[Syn-Slack] {err}");
            err.exit_code()
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = SynslackConfig::load_from_optional_path(cli.config.as_deref())?;
    let repo = cli.repo.clone().unwrap_or_else(|| config.repo.clone());
    let local = cli.local.clone().unwrap_or_else(|| config.local.clone());
    let prefixes = if cli.prefixes.is_empty() {
        config.prefixes.clone()
    } else {
        cli.prefixes.clone()
    };

    let session_stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let log_path = cli.log.clone().or_else(|| {
        config
            .log_dir
            .as_ref()
            .map(|dir| dir.join(format!("synslack_{session_stamp}.log")))
    });
    let logger = Logger::new(log_path, cli.verbose)?;
    logger.info("INIT", "Syn-Slack scan starting.");

    match cli.command {
        Command::Available => {
            let pkgs = read_repository(&repo, &prefixes, &logger)?;
            logger.info(
                "REPO",
                format!("Reconciled {} repository packages", pkgs.len()),
            );
            render_records(&pkgs, cli.json)?;
        }
        Command::List => {
            let pkgs = read_package_log(&local)?;
            logger.info("LOCAL", format!("Found {} installed packages", pkgs.len()));
            render_records(&pkgs, cli.json)?;
        }
        Command::Upgrade => {
            let repo_pkgs = read_repository(&repo, &prefixes, &logger)?;
            let local_pkgs = read_package_log(&local)?;
            let candidates = match_upgrades(&repo_pkgs, &local_pkgs);
            logger.info(
                "UPGRADE",
                format!(
                    "{} of {} local packages have newer repository builds",
                    candidates.len(),
                    local_pkgs.len()
                ),
            );
            render_records(&candidates, cli.json)?;
        }
    }

    logger.info("COMPLETE", "Scan finished.");
    logger.finalize()?;

    Ok(ExitCode::SUCCESS)
}

/// Print records as tab-separated lines, or as one pretty JSON array.
fn render_records<T>(records: &[T], json: bool) -> Result<()>
where
    T: fmt::Display + Serialize,
{
    if json {
        let rendered = serde_json::to_string_pretty(records).map_err(|err| {
            SynslackError::Serialization(format!("Failed to encode records: {err}"))
        })?;
        println!("{rendered}");
    } else {
        for record in records {
            println!("{record}");
        }
    }
    Ok(())
}
