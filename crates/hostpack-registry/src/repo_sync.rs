use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hostpack_core::validate_package_name;
use tracing::{info, warn};

use crate::{run_git_clone, run_git_command, RepositoryCatalog};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoSyncStatus {
    Synced,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSyncResult {
    pub path: PathBuf,
    pub status: RepoSyncStatus,
    pub error: Option<String>,
}

/// Directory name a clone of `remote_url` lands in: the last URL segment
/// without a trailing `.git`.
pub fn repository_dir_name(remote_url: &str) -> Result<String> {
    let trimmed = remote_url.trim().trim_end_matches('/');
    let last = trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(trimmed);
    let name = last.strip_suffix(".git").unwrap_or(last);
    validate_package_name(name)
        .with_context(|| format!("cannot derive a repository name from '{remote_url}'"))?;
    Ok(name.to_string())
}

/// Clones into `<repos_dir>/<name>` and records the clone in `repos.list`.
pub fn clone_repository(
    remote_url: &str,
    repos_dir: &Path,
    catalog: &RepositoryCatalog,
) -> Result<PathBuf> {
    let name = repository_dir_name(remote_url)?;
    let destination = repos_dir.join(&name);
    if destination.exists() {
        anyhow::bail!(
            "repo-clone-failed: destination already exists: {}",
            destination.display()
        );
    }
    std::fs::create_dir_all(repos_dir)
        .with_context(|| format!("failed to create {}", repos_dir.display()))?;

    run_git_clone(remote_url, &destination)?;
    catalog.record_clone(&destination)?;
    info!(remote = remote_url, path = %destination.display(), "repository cloned");
    Ok(destination)
}

pub fn sync_repository(path: &Path) -> Result<()> {
    if !path.is_dir() {
        anyhow::bail!("repo-sync-failed: not a directory: {}", path.display());
    }
    run_git_command(path, &["pull"])?;
    info!(path = %path.display(), "repository synced");
    Ok(())
}

/// Syncs every catalog entry, continuing past individual failures.
pub fn sync_all(catalog: &RepositoryCatalog) -> Result<Vec<RepoSyncResult>> {
    let mut results = Vec::new();
    for path in catalog.sync_targets()? {
        let result = match sync_repository(&path) {
            Ok(()) => RepoSyncResult {
                path,
                status: RepoSyncStatus::Synced,
                error: None,
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "repository sync failed");
                RepoSyncResult {
                    path,
                    status: RepoSyncStatus::Failed,
                    error: Some(format!("{err:#}")),
                }
            }
        };
        results.push(result);
    }
    Ok(results)
}
