use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hostpack_core::Repository;

/// The locally known package repositories: `repos.list` (one cloned path per
/// line, appended by clone) and the optional `repos.json` declaration.
#[derive(Debug, Clone)]
pub struct RepositoryCatalog {
    list_path: PathBuf,
    json_path: PathBuf,
}

impl RepositoryCatalog {
    pub fn new(list_path: impl Into<PathBuf>, json_path: impl Into<PathBuf>) -> Self {
        Self {
            list_path: list_path.into(),
            json_path: json_path.into(),
        }
    }

    pub fn list_path(&self) -> &Path {
        &self.list_path
    }

    pub fn listed_paths(&self) -> Result<Vec<PathBuf>> {
        let Some(raw) = read_optional(&self.list_path)? else {
            return Ok(Vec::new());
        };
        Ok(parse_repos_list(&raw))
    }

    pub fn repositories(&self) -> Result<Vec<Repository>> {
        let Some(raw) = read_optional(&self.json_path)? else {
            return Ok(Vec::new());
        };
        Repository::list_from_json_str(&raw)
            .with_context(|| format!("failed to parse {}", self.json_path.display()))
    }

    /// Appends `path` to `repos.list` unless it is already listed.
    pub fn record_clone(&self, path: &Path) -> Result<bool> {
        let existing = self.listed_paths()?;
        if existing.iter().any(|listed| listed == path) {
            return Ok(false);
        }

        if let Some(parent) = self.list_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let needs_separator = fs::read(&self.list_path)
            .map(|raw| !raw.is_empty() && !raw.ends_with(b"\n"))
            .unwrap_or(false);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.list_path)
            .with_context(|| format!("failed to open {}", self.list_path.display()))?;
        let mut line = String::new();
        if needs_separator {
            line.push('\n');
        }
        line.push_str(&path.display().to_string());
        line.push('\n');
        file.write_all(line.as_bytes())
            .with_context(|| format!("failed to append to {}", self.list_path.display()))?;
        Ok(true)
    }

    /// Paths from `repos.list` followed by any `repos.json` entries not
    /// already listed.
    pub fn sync_targets(&self) -> Result<Vec<PathBuf>> {
        let mut targets = self.listed_paths()?;
        for repository in self.repositories()? {
            if !targets.contains(&repository.local_path) {
                targets.push(repository.local_path);
            }
        }
        Ok(targets)
    }
}

pub(crate) fn parse_repos_list(raw: &str) -> Vec<PathBuf> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}
