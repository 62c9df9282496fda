use std::path::{Component, Path};

use hostpack_core::{validate_package_name, Scope};
use tracing::{info, warn};

use crate::error::{InstallError, Result};
use crate::fs_utils::remove_path_if_exists;
use crate::install::Installer;
use crate::profile::{remove_path, ProfileUpdate};
use crate::store::PackageStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallReport {
    pub name: String,
    pub version: String,
    pub installed_path: Option<String>,
    pub profile: Option<ProfileUpdate>,
    pub removed_installed_path: bool,
    pub removed_store_record: bool,
}

impl<S: PackageStore> Installer<S> {
    /// Removes one package's PATH line, installed tree and store record.
    /// Dependencies are left installed.
    pub fn uninstall(&self, name: &str, scope: &Scope) -> Result<UninstallReport> {
        validate_package_name(name)?;
        let Some(descriptor) = self.store.load(name)? else {
            return Err(InstallError::PackageNotFound {
                name: name.to_string(),
                path: self.store.manifest_path(name),
            });
        };

        if let Some(owner) = descriptor.owner_scope() {
            if &owner != scope {
                warn!(
                    package = name,
                    recorded = %owner,
                    requested = %scope,
                    "uninstall scope differs from install scope"
                );
            }
        }

        let mut report = UninstallReport {
            name: name.to_string(),
            version: descriptor.version.clone(),
            installed_path: descriptor.installed_path().map(str::to_string),
            profile: None,
            removed_installed_path: false,
            removed_store_record: false,
        };

        if let Some(installed_path) = descriptor.installed_path() {
            let profile = self.layout.profile_path(scope);
            report.profile = Some(remove_path(&profile, installed_path)?);

            if is_removable_install_path(installed_path) {
                let target = self.layout.host_path(installed_path);
                report.removed_installed_path = remove_path_if_exists(&target).map_err(|err| {
                    InstallError::RemoveFailed {
                        path: target.clone(),
                        source: err,
                    }
                })?;
            } else {
                warn!(
                    package = name,
                    path = installed_path,
                    "refusing to delete installed_path"
                );
            }
        } else {
            info!(package = name, "installed_path not set; PATH unchanged");
        }

        report.removed_store_record = self.store.remove(name)?;
        info!(package = name, scope = %scope, "uninstalled");
        Ok(report)
    }
}

/// The filesystem root itself is never a valid installed tree.
fn is_removable_install_path(installed_path: &str) -> bool {
    Path::new(installed_path)
        .components()
        .any(|component| matches!(component, Component::Normal(_)))
}
