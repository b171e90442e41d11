/*============================================================
  Synavera Project: Syn-Slack
  Module: synslack::upgrade
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Match locally installed packages against the reconciled
    repository set and surface upgrade candidates.

  Security / Safety Notes:
    Pure in-memory matching; no I/O performed in this module.

  Dependencies:
    PackageInfo / UpgradeInfo record types.

  Operational Scope:
    Backs the `upgrade` operation.

  Revision History:
    2025-03-13 COD  Authored upgrade matcher.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Local packages absent upstream are never an error
    - Deterministic, name-sorted candidate ordering
============================================================*/

use crate::package_info::{PackageInfo, UpgradeInfo};

/// Pair each local package with the repository record of the same name,
/// emitting a candidate whenever version or build differ. Local packages
/// with no repository counterpart are skipped. The repository sequence
/// carries at most one record per name, so the first match is the match.
pub fn match_upgrades(repo: &[PackageInfo], local: &[PackageInfo]) -> Vec<UpgradeInfo> {
    let mut out = Vec::new();

    for local_pkg in local {
        let Some(repo_pkg) = repo.iter().find(|pkg| pkg.name == local_pkg.name) else {
            continue;
        };

        if repo_pkg.version != local_pkg.version || repo_pkg.build != local_pkg.build {
            out.push(UpgradeInfo {
                local: local_pkg.clone(),
                repo: repo_pkg.clone(),
            });
        }
    }

    out.sort_by(|a, b| a.local.name.cmp(&b.local.name));
    out
}
