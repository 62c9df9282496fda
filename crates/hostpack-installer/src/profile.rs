use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{InstallError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileUpdate {
    Appended,
    AlreadyPresent,
    Removed(usize),
    MissingProfile,
}

/// The exact line written for an installed path, and the only line shape
/// that removal matches.
pub fn export_line(path_to_add: &str) -> String {
    format!("export PATH=$PATH:{path_to_add}")
}

pub fn append_path(profile: &Path, path_to_add: &str) -> Result<ProfileUpdate> {
    let Some(content) = read_profile(profile)? else {
        warn!(profile = %profile.display(), "shell profile not found; PATH not updated");
        return Ok(ProfileUpdate::MissingProfile);
    };

    let line = export_line(path_to_add);
    if content.lines().any(|existing| existing.trim() == line) {
        debug!(profile = %profile.display(), path = path_to_add, "PATH entry already present");
        return Ok(ProfileUpdate::AlreadyPresent);
    }

    let mut payload = String::new();
    if !content.is_empty() && !content.ends_with('\n') {
        payload.push('\n');
    }
    payload.push_str(&line);
    payload.push('\n');

    let mut file = OpenOptions::new()
        .append(true)
        .open(profile)
        .map_err(|err| InstallError::profile_io(profile, err))?;
    file.write_all(payload.as_bytes())
        .map_err(|err| InstallError::profile_io(profile, err))?;
    Ok(ProfileUpdate::Appended)
}

/// Drops every line equal to the export line for `path_to_add`, keeping the
/// rest in order. The rewrite is not atomic.
pub fn remove_path(profile: &Path, path_to_add: &str) -> Result<ProfileUpdate> {
    let Some(content) = read_profile(profile)? else {
        warn!(profile = %profile.display(), "shell profile not found; nothing to remove");
        return Ok(ProfileUpdate::MissingProfile);
    };

    let line = export_line(path_to_add);
    let mut removed = 0;
    let mut kept = Vec::new();
    for existing in content.lines() {
        if existing.trim() == line {
            removed += 1;
        } else {
            kept.push(existing);
        }
    }
    if removed == 0 {
        return Ok(ProfileUpdate::Removed(0));
    }

    let mut rewritten = kept.join("\n");
    if content.ends_with('\n') && !rewritten.is_empty() {
        rewritten.push('\n');
    }
    fs::write(profile, rewritten.as_bytes()).map_err(|err| InstallError::profile_io(profile, err))?;
    Ok(ProfileUpdate::Removed(removed))
}

fn read_profile(profile: &Path) -> Result<Option<String>> {
    match fs::read_to_string(profile) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(InstallError::profile_io(profile, err)),
    }
}
