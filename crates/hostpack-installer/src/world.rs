use std::fs;
use std::path::PathBuf;

use hostpack_core::PackageDescriptor;
use tracing::info;

use crate::error::{InstallError, Result};
use crate::layout::HostLayout;
use crate::store::PackageStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldSnapshot {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

/// `name version installed_path owner`, with trailing unset fields dropped.
pub fn render_world_line(descriptor: &PackageDescriptor) -> String {
    let fields = [
        descriptor.name.as_str(),
        descriptor.version.as_str(),
        descriptor.installed_path().unwrap_or(""),
        descriptor.owner().unwrap_or(""),
    ];
    fields.join(" ").trim_end().to_string()
}

/// Rebuilds the world file from the store. The whole snapshot is assembled
/// before the file is touched, so a failed walk leaves the previous file as
/// it was.
pub fn regenerate_world<S: PackageStore>(layout: &HostLayout, store: &S) -> Result<WorldSnapshot> {
    let snapshot_failed = |source: InstallError| InstallError::SnapshotFailed {
        source: Box::new(source),
    };

    let descriptors = store.list().map_err(snapshot_failed)?;
    let lines = descriptors
        .iter()
        .map(render_world_line)
        .collect::<Vec<_>>();

    let mut payload = lines.join("\n");
    if !payload.is_empty() {
        payload.push('\n');
    }

    let path = layout.world_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| snapshot_failed(InstallError::store_io(parent, err)))?;
    }
    fs::write(&path, payload.as_bytes())
        .map_err(|err| snapshot_failed(InstallError::store_io(&path, err)))?;

    info!(path = %path.display(), packages = lines.len(), "world file regenerated");
    Ok(WorldSnapshot { path, lines })
}
