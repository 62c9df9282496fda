use std::fs;
use std::io;
use std::path::PathBuf;

use hostpack_core::{PackageDescriptor, MANIFEST_FILE_NAME};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{InstallError, Result};
use crate::fs_utils::remove_path_if_exists;
use crate::layout::HostLayout;

/// Durable record of installed package metadata.
///
/// The installer only talks to the store through this trait, so the
/// directory tree can be swapped for another backing store.
pub trait PackageStore {
    /// Persists the source manifest text verbatim for `name`.
    fn import_manifest(&self, name: &str, raw: &str) -> Result<PathBuf>;

    fn load(&self, name: &str) -> Result<Option<PackageDescriptor>>;

    /// Overwrites the record stored under `name`, the package directory the
    /// manifest was imported from. Not atomic.
    fn save(&self, name: &str, descriptor: &PackageDescriptor) -> Result<PathBuf>;

    /// Location handed to install scripts as their manifest argument.
    fn manifest_path(&self, name: &str) -> PathBuf;

    fn remove(&self, name: &str) -> Result<bool>;

    /// Every manifest in the store; any unreadable record fails the call.
    fn list(&self) -> Result<Vec<PackageDescriptor>>;

    /// Names of installed package entries, sorted.
    fn names(&self) -> Result<Vec<String>>;
}

#[derive(Debug, Clone)]
pub struct FsStore {
    layout: HostLayout,
}

impl FsStore {
    pub fn new(layout: HostLayout) -> Self {
        Self { layout }
    }

    fn read_manifest(&self, path: &std::path::Path) -> Result<PackageDescriptor> {
        let raw = fs::read_to_string(path).map_err(|err| InstallError::store_io(path, err))?;
        PackageDescriptor::from_json_str(&raw).map_err(|source| InstallError::ManifestInvalid {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl PackageStore for FsStore {
    fn import_manifest(&self, name: &str, raw: &str) -> Result<PathBuf> {
        let dir = self.layout.store_package_dir(name);
        fs::create_dir_all(&dir).map_err(|err| InstallError::store_io(&dir, err))?;

        let path = self.layout.store_manifest_path(name);
        fs::write(&path, raw.as_bytes()).map_err(|err| InstallError::store_io(&path, err))?;
        debug!(package = name, path = %path.display(), "copied manifest into store");
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<Option<PackageDescriptor>> {
        let path = self.layout.store_manifest_path(name);
        match fs::metadata(&path) {
            Ok(_) => self.read_manifest(&path).map(Some),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(InstallError::store_io(&path, err)),
        }
    }

    fn save(&self, name: &str, descriptor: &PackageDescriptor) -> Result<PathBuf> {
        let path = self.layout.store_manifest_path(name);
        let rendered =
            descriptor
                .to_json_string()
                .map_err(|source| InstallError::ManifestInvalid {
                    path: path.clone(),
                    source,
                })?;
        fs::write(&path, rendered.as_bytes()).map_err(|err| InstallError::store_io(&path, err))?;
        Ok(path)
    }

    fn manifest_path(&self, name: &str) -> PathBuf {
        self.layout.store_manifest_path(name)
    }

    fn remove(&self, name: &str) -> Result<bool> {
        let dir = self.layout.store_package_dir(name);
        remove_path_if_exists(&dir).map_err(|err| InstallError::store_io(&dir, err))
    }

    fn list(&self) -> Result<Vec<PackageDescriptor>> {
        let root = self.layout.store_dir();
        if !root.exists() {
            return Ok(Vec::new());
        }

        let mut descriptors = Vec::new();
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().map(|p| p.to_path_buf()).unwrap_or_else(|| root.clone());
                InstallError::store_io(path, io::Error::other(err))
            })?;
            if !entry.file_type().is_file() || entry.file_name() != MANIFEST_FILE_NAME {
                continue;
            }
            descriptors.push(self.read_manifest(entry.path())?);
        }
        Ok(descriptors)
    }

    fn names(&self) -> Result<Vec<String>> {
        let root = self.layout.store_dir();
        if !root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&root).map_err(|err| InstallError::store_io(&root, err))? {
            let entry = entry.map_err(|err| InstallError::store_io(&root, err))?;
            let file_type = entry
                .file_type()
                .map_err(|err| InstallError::store_io(entry.path(), err))?;
            if !file_type.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
