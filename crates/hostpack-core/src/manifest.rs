use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::names::{validate_package_name, NameError};
use crate::scope::Scope;

/// File name of the manifest in both package sources and the store.
pub const MANIFEST_FILE_NAME: &str = "package.json";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to parse package manifest: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid package name in manifest: {0}")]
    Name(#[from] NameError),
    #[error("installed_path '{0}' must be an absolute path")]
    RelativeInstalledPath(String),
    #[error("install_script '{0}' must be a relative path inside the package directory")]
    UnsafeInstallScript(String),
}

/// Metadata record describing one package.
///
/// `install_script` and `installed_path` are kept exactly as written so the
/// store copy stays byte-compatible with the source; producers commonly write
/// `""` for "not set", which the accessors normalize away.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageDescriptor {
    pub name: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_path: Option<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PackageDescriptor {
    pub fn from_json_str(input: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(input)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn to_json_string(&self) -> Result<String, ManifestError> {
        let mut rendered = serde_json::to_string_pretty(self)?;
        rendered.push('\n');
        Ok(rendered)
    }

    pub fn install_script(&self) -> Option<&str> {
        non_empty(self.install_script.as_deref())
    }

    pub fn installed_path(&self) -> Option<&str> {
        non_empty(self.installed_path.as_deref())
    }

    pub fn owner(&self) -> Option<&str> {
        non_empty(self.owner.as_deref())
    }

    pub fn owner_scope(&self) -> Option<Scope> {
        self.owner().map(Scope::from_owner_tag)
    }

    pub fn set_owner(&mut self, scope: &Scope) {
        self.owner = Some(scope.owner_tag().to_string());
    }

    fn validate(&self) -> Result<(), ManifestError> {
        validate_package_name(&self.name)?;
        for dependency in &self.dependencies {
            validate_package_name(dependency)?;
        }
        if let Some(installed_path) = self.installed_path() {
            if !Path::new(installed_path).is_absolute() {
                return Err(ManifestError::RelativeInstalledPath(
                    installed_path.to_string(),
                ));
            }
        }
        if let Some(script) = self.install_script() {
            let escapes = Path::new(script).components().any(|component| {
                !matches!(component, Component::Normal(_) | Component::CurDir)
            });
            if escapes {
                return Err(ManifestError::UnsafeInstallScript(script.to_string()));
            }
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
