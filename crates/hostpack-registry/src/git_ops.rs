use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::debug;

pub(crate) fn base_git_command() -> Command {
    let mut command = Command::new("git");
    command
        .arg("-c")
        .arg("core.autocrlf=false")
        .arg("-c")
        .arg("core.eol=lf");
    command
}

pub(crate) fn run_git_clone(remote_url: &str, destination: &Path) -> Result<()> {
    debug!(remote = remote_url, destination = %destination.display(), "git clone");
    let output = base_git_command()
        .arg("clone")
        .arg("--")
        .arg(remote_url)
        .arg(destination)
        .output()
        .with_context(|| format!("repo-clone-failed: '{remote_url}' failed launching git clone"))?;
    if !output.status.success() {
        anyhow::bail!(
            "repo-clone-failed: '{}' git clone failed: {}",
            remote_url,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}

pub(crate) fn run_git_command(repo_root: &Path, args: &[&str]) -> Result<()> {
    debug!(repo = %repo_root.display(), args = ?args, "git");
    let output = base_git_command()
        .args(args)
        .current_dir(repo_root)
        .output()
        .with_context(|| {
            format!(
                "repo-sync-failed: '{}' failed launching git {}",
                repo_root.display(),
                args.join(" ")
            )
        })?;
    if !output.status.success() {
        anyhow::bail!(
            "repo-sync-failed: '{}' git {} failed: {}",
            repo_root.display(),
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}
