use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::config::Config;
use crate::model::ChangeSet;

/// Lists files that differ from `baseline` in the working tree at `repo_root`.
///
/// Paths are relative to `repo_root`, which may be a subdirectory of the
/// repository; changes outside it are not listed. Non-ASCII paths come back
/// verbatim. Any failure here (git missing, not a repository, unknown
/// baseline) is fatal.
pub async fn list_changed_files(repo_root: &Path, baseline: &str) -> Result<ChangeSet> {
    info!("Listing files changed against {baseline} in {}", repo_root.display());

    let out = Command::new("git")
        .args(["-c", "core.quotePath=false", "diff", "--name-only", "--relative", "-z"])
        .arg(baseline)
        .current_dir(repo_root)
        .output()
        .await
        .with_context(|| format!("failed to run `git diff --name-only {baseline}`"))?;

    if !out.status.success() {
        return Err(anyhow!(
            "git diff against {baseline} failed:\n{}",
            String::from_utf8_lossy(&out.stderr)
        ));
    }

    let changes = parse_name_only(&String::from_utf8_lossy(&out.stdout));
    debug!("git reported {} changed paths", changes.paths.len());
    Ok(changes)
}

/// Parses `git diff --name-only -z` output, NUL-separated paths.
pub fn parse_name_only(output: &str) -> ChangeSet {
    ChangeSet {
        paths: output
            .split('\0')
            .filter(|entry| !entry.is_empty())
            .map(PathBuf::from)
            .collect(),
    }
}

impl ChangeSet {
    /// Paths that match the configured document pattern, listing order kept.
    pub fn documents<'a>(&'a self, config: &'a Config) -> impl Iterator<Item = &'a PathBuf> + 'a {
        self.paths.iter().filter(|path| config.is_document(path))
    }
}
