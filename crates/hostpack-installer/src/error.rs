use std::io;
use std::path::PathBuf;

use hostpack_core::{ManifestError, NameError};
use thiserror::Error;

pub type Result<T, E = InstallError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("invalid package name: {0}")]
    InvalidPackageName(#[from] NameError),

    #[error("package '{name}' not found at {}", path.display())]
    PackageNotFound { name: String, path: PathBuf },

    #[error("invalid manifest {}: {source}", path.display())]
    ManifestInvalid {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },

    #[error("install script for '{name}' failed: {reason}")]
    ScriptExecutionFailed { name: String, reason: String },

    #[error("execution identity '{user}' could not be resolved")]
    UserLookupFailed { user: String },

    #[error("failed to update shell profile {}: {source}", path.display())]
    ProfileIoFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("world file regeneration failed: {source}")]
    SnapshotFailed {
        #[source]
        source: Box<InstallError>,
    },

    #[error("dependency cycle detected: {}", chain.join(" -> "))]
    DependencyCycle { chain: Vec<String> },

    #[error("package '{name}' stopped because dependency '{dependency}' failed: {source}")]
    DependencyFailed {
        name: String,
        dependency: String,
        #[source]
        source: Box<InstallError>,
    },

    #[error("store operation failed at {}: {source}", path.display())]
    StoreIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove {}: {source}", path.display())]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read configuration {}: {reason}", path.display())]
    ConfigReadFailed { path: PathBuf, reason: String },
}

impl InstallError {
    pub(crate) fn store_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::StoreIo {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn profile_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ProfileIoFailed {
            path: path.into(),
            source,
        }
    }

    /// Innermost error once dependency wrapping is peeled away.
    pub fn root_cause(&self) -> &InstallError {
        match self {
            Self::DependencyFailed { source, .. } | Self::SnapshotFailed { source } => {
                source.root_cause()
            }
            other => other,
        }
    }
}
