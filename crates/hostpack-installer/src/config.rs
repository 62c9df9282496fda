use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::error::{InstallError, Result};

pub const DEFAULT_SCRIPT_USER: &str = "nobody";
pub const DEFAULT_SHELL: &str = "sh";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    #[serde(default = "default_script_user")]
    pub script_user: String,
    #[serde(default = "default_shell")]
    pub shell: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            script_user: default_script_user(),
            shell: default_shell(),
        }
    }
}

impl HostConfig {
    pub fn from_toml_str(input: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}

fn default_script_user() -> String {
    DEFAULT_SCRIPT_USER.to_string()
}

fn default_shell() -> String {
    DEFAULT_SHELL.to_string()
}

/// Loads the optional host configuration; a missing file yields defaults.
pub fn load_host_config(path: &Path) -> Result<HostConfig> {
    let Some(raw) = read_optional(path)? else {
        return Ok(HostConfig::default());
    };
    HostConfig::from_toml_str(&raw).map_err(|err| InstallError::ConfigReadFailed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Reads the global script preamble. Absent means no preamble; present but
/// unreadable is fatal for the whole run.
pub fn load_preamble(path: &Path) -> Result<Option<String>> {
    read_optional(path)
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(InstallError::ConfigReadFailed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }),
    }
}
