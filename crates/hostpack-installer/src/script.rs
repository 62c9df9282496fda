use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use hostpack_core::Scope;
use nix::unistd::User;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{InstallError, Result};

/// Account that user-scoped install scripts run as.
///
/// Resolved once when the executor is built; an account that does not exist
/// leaves the identity unresolved and user-scoped runs fail before spawning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptIdentity {
    name: String,
    ids: Option<(u32, u32)>,
}

impl ScriptIdentity {
    pub fn resolve(name: &str) -> Self {
        let ids = match User::from_name(name) {
            Ok(Some(user)) => Some((user.uid.as_raw(), user.gid.as_raw())),
            Ok(None) => {
                warn!(user = name, "execution identity does not exist");
                None
            }
            Err(err) => {
                warn!(user = name, error = %err, "execution identity lookup failed");
                None
            }
        };
        Self {
            name: name.to_string(),
            ids,
        }
    }

    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ids: None,
        }
    }

    pub fn with_ids(name: impl Into<String>, uid: u32, gid: u32) -> Self {
        Self {
            name: name.into(),
            ids: Some((uid, gid)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_resolved(&self) -> bool {
        self.ids.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScriptInvocation<'a> {
    pub package: &'a str,
    pub script: &'a Path,
    pub manifest: &'a Path,
    pub package_dir: &'a Path,
    pub scope: &'a Scope,
}

#[derive(Debug, Clone)]
pub struct ScriptExecutor {
    shell: String,
    preamble: Option<String>,
    identity: ScriptIdentity,
}

impl ScriptExecutor {
    pub fn new(shell: impl Into<String>, preamble: Option<String>, identity: ScriptIdentity) -> Self {
        Self {
            shell: shell.into(),
            preamble,
            identity,
        }
    }

    pub fn identity(&self) -> &ScriptIdentity {
        &self.identity
    }

    /// Runs the script with `<manifest> <package_dir>` as positional
    /// arguments. The script file on disk is never modified; a configured
    /// preamble is combined with it in a throwaway wrapper.
    pub fn run(&self, invocation: ScriptInvocation<'_>) -> Result<()> {
        let ids = if invocation.scope.requires_deescalation() {
            let Some(ids) = self.identity.ids else {
                return Err(InstallError::UserLookupFailed {
                    user: self.identity.name.clone(),
                });
            };
            Some(ids)
        } else {
            None
        };

        if !invocation.script.is_file() {
            return Err(script_failed(
                invocation.package,
                format!("install script not found: {}", invocation.script.display()),
            ));
        }

        let wrapper = match &self.preamble {
            Some(preamble) => Some(self.write_wrapper(invocation, preamble)?),
            None => None,
        };
        let entry: PathBuf = wrapper
            .as_ref()
            .map(|file| file.path().to_path_buf())
            .unwrap_or_else(|| invocation.script.to_path_buf());

        let mut command = Command::new(&self.shell);
        command
            .arg(&entry)
            .arg(invocation.manifest)
            .arg(invocation.package_dir)
            .current_dir(invocation.package_dir);
        if let Some((uid, gid)) = ids {
            command.gid(gid).uid(uid);
        }
        debug!(
            package = invocation.package,
            shell = %self.shell,
            script = %entry.display(),
            identity = ids.map(|_| self.identity.name.as_str()),
            "running install script"
        );

        let status = command.status().map_err(|err| {
            script_failed(
                invocation.package,
                format!("failed to launch {}: {err}", self.shell),
            )
        })?;
        drop(wrapper);

        if !status.success() {
            return Err(script_failed(invocation.package, format!("{status}")));
        }
        Ok(())
    }

    fn write_wrapper(&self, invocation: ScriptInvocation<'_>, preamble: &str) -> Result<NamedTempFile> {
        let body = fs::read_to_string(invocation.script).map_err(|err| {
            script_failed(
                invocation.package,
                format!("failed to read {}: {err}", invocation.script.display()),
            )
        })?;

        let prepare = |err: std::io::Error| {
            script_failed(
                invocation.package,
                format!("failed to prepare script wrapper: {err}"),
            )
        };
        let mut wrapper = tempfile::Builder::new()
            .prefix("hostpack-")
            .suffix(".sh")
            .tempfile()
            .map_err(prepare)?;
        wrapper
            .write_all(compose_script(preamble, &body).as_bytes())
            .map_err(prepare)?;
        wrapper.flush().map_err(prepare)?;
        // Readable by a de-escalated identity.
        fs::set_permissions(wrapper.path(), fs::Permissions::from_mode(0o644)).map_err(prepare)?;
        Ok(wrapper)
    }
}

pub(crate) fn compose_script(preamble: &str, body: &str) -> String {
    let mut composed = String::with_capacity(preamble.len() + body.len() + 1);
    composed.push_str(preamble);
    if !preamble.is_empty() && !preamble.ends_with('\n') {
        composed.push('\n');
    }
    composed.push_str(body);
    composed
}

fn script_failed(package: &str, reason: String) -> InstallError {
    InstallError::ScriptExecutionFailed {
        name: package.to_string(),
        reason,
    }
}
