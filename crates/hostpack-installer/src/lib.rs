mod config;
mod error;
mod fs_utils;
mod install;
mod layout;
mod profile;
mod script;
mod store;
mod uninstall;
mod world;

pub use config::{load_host_config, load_preamble, HostConfig, DEFAULT_SCRIPT_USER, DEFAULT_SHELL};
pub use error::{InstallError, Result};
pub use install::{InstallOutcome, InstallReport, Installer};
pub use layout::HostLayout;
pub use profile::{append_path, export_line, remove_path, ProfileUpdate};
pub use script::{ScriptExecutor, ScriptIdentity, ScriptInvocation};
pub use store::{FsStore, PackageStore};
pub use uninstall::UninstallReport;
pub use world::{regenerate_world, render_world_line, WorldSnapshot};
