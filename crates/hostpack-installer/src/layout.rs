use std::path::{Path, PathBuf};

use hostpack_core::{Scope, MANIFEST_FILE_NAME};

use crate::error::{InstallError, Result};

/// Fixed on-disk layout, rooted at `/` in production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLayout {
    root: PathBuf,
}

impl HostLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn system() -> Self {
        Self::new("/")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.root.join("packages")
    }

    pub fn repos_dir(&self) -> PathBuf {
        self.packages_dir().join("repos")
    }

    pub fn store_dir(&self) -> PathBuf {
        self.packages_dir().join("store")
    }

    pub fn world_path(&self) -> PathBuf {
        self.packages_dir().join("world")
    }

    pub fn preamble_path(&self) -> PathBuf {
        self.packages_dir().join("config")
    }

    pub fn repos_list_path(&self) -> PathBuf {
        self.packages_dir().join("repos.list")
    }

    pub fn repos_json_path(&self) -> PathBuf {
        self.packages_dir().join("repos.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("etc").join("hostpack.toml")
    }

    pub fn source_dir(&self, name: &str) -> PathBuf {
        self.repos_dir().join(name)
    }

    pub fn source_manifest_path(&self, name: &str) -> PathBuf {
        self.source_dir(name).join(MANIFEST_FILE_NAME)
    }

    pub fn store_package_dir(&self, name: &str) -> PathBuf {
        self.store_dir().join(name)
    }

    pub fn store_manifest_path(&self, name: &str) -> PathBuf {
        self.store_package_dir(name).join(MANIFEST_FILE_NAME)
    }

    pub fn system_profile_path(&self) -> PathBuf {
        self.root.join("etc").join("profile")
    }

    /// Derived from the user name alone; the account's configured home
    /// directory is not consulted.
    pub fn user_profile_path(&self, user: &str) -> PathBuf {
        self.root.join("home").join(user).join(".profile")
    }

    pub fn profile_path(&self, scope: &Scope) -> PathBuf {
        match scope {
            Scope::SystemWide => self.system_profile_path(),
            Scope::User(user) => self.user_profile_path(user),
        }
    }

    /// Maps an absolute `installed_path` from a manifest onto this layout's root.
    pub fn host_path(&self, absolute: &str) -> PathBuf {
        let relative = absolute.trim_start_matches('/');
        if relative.is_empty() {
            return self.root.clone();
        }
        self.root.join(relative)
    }

    pub fn ensure_base_dirs(&self) -> Result<()> {
        for dir in [self.packages_dir(), self.repos_dir(), self.store_dir()] {
            std::fs::create_dir_all(&dir).map_err(|err| InstallError::store_io(&dir, err))?;
        }
        Ok(())
    }
}
