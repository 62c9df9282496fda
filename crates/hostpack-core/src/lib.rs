mod manifest;
mod names;
mod repository;
mod scope;

pub use manifest::{ManifestError, PackageDescriptor, MANIFEST_FILE_NAME};
pub use names::{validate_package_name, validate_user_name, NameError};
pub use repository::Repository;
pub use scope::{Scope, SYSTEM_WIDE_OWNER};

#[cfg(test)]
mod tests;
