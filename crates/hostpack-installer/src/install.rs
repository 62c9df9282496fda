use std::collections::HashMap;
use std::fs;
use std::io;

use hostpack_core::{validate_package_name, Scope};
use tracing::{debug, info, warn};

use crate::error::{InstallError, Result};
use crate::layout::HostLayout;
use crate::profile::{append_path, ProfileUpdate};
use crate::script::{ScriptExecutor, ScriptInvocation};
use crate::store::{FsStore, PackageStore};
use crate::world::{regenerate_world, WorldSnapshot};

/// Drives install and uninstall against a layout, a store and a script
/// executor.
#[derive(Debug, Clone)]
pub struct Installer<S = FsStore> {
    pub(crate) layout: HostLayout,
    pub(crate) store: S,
    pub(crate) executor: ScriptExecutor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub name: String,
    pub version: String,
    pub installed_path: Option<String>,
    pub script_ran: bool,
    pub profile: Option<ProfileUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub root: String,
    pub scope: Scope,
    /// Packages in the order their installation finished.
    pub packages: Vec<InstallOutcome>,
    /// Dependencies already installed earlier in the same run.
    pub deduplicated: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Completed,
}

struct InstallRun<'a> {
    scope: &'a Scope,
    visits: HashMap<String, VisitState>,
    stack: Vec<String>,
    report: InstallReport,
}

impl Installer<FsStore> {
    pub fn with_fs_store(layout: HostLayout, executor: ScriptExecutor) -> Self {
        let store = FsStore::new(layout.clone());
        Self::new(layout, store, executor)
    }
}

impl<S: PackageStore> Installer<S> {
    pub fn new(layout: HostLayout, store: S, executor: ScriptExecutor) -> Self {
        Self {
            layout,
            store,
            executor,
        }
    }

    pub fn layout(&self) -> &HostLayout {
        &self.layout
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn executor(&self) -> &ScriptExecutor {
        &self.executor
    }

    /// Installs `name` and, depth-first in declaration order, its
    /// dependencies with the same scope. Work completed before a failure is
    /// left in place.
    pub fn install(&self, name: &str, scope: &Scope) -> Result<InstallReport> {
        let mut run = InstallRun {
            scope,
            visits: HashMap::new(),
            stack: Vec::new(),
            report: InstallReport {
                root: name.to_string(),
                scope: scope.clone(),
                packages: Vec::new(),
                deduplicated: Vec::new(),
            },
        };
        self.install_one(name, &mut run)?;
        Ok(run.report)
    }

    /// Installed package names, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        self.store.names()
    }

    pub fn regenerate_world(&self) -> Result<WorldSnapshot> {
        regenerate_world(&self.layout, &self.store)
    }

    fn install_one(&self, name: &str, run: &mut InstallRun<'_>) -> Result<()> {
        validate_package_name(name)?;
        match run.visits.get(name) {
            Some(VisitState::InProgress) => {
                let start = run
                    .stack
                    .iter()
                    .position(|entry| entry == name)
                    .unwrap_or(0);
                let mut chain = run.stack[start..].to_vec();
                chain.push(name.to_string());
                return Err(InstallError::DependencyCycle { chain });
            }
            Some(VisitState::Completed) => {
                debug!(package = name, "already installed in this run");
                run.report.deduplicated.push(name.to_string());
                return Ok(());
            }
            None => {}
        }

        run.visits.insert(name.to_string(), VisitState::InProgress);
        run.stack.push(name.to_string());
        let result = self.install_package(name, run);
        run.stack.pop();
        match result {
            Ok(outcome) => {
                run.visits.insert(name.to_string(), VisitState::Completed);
                run.report.packages.push(outcome);
                Ok(())
            }
            Err(err) => {
                run.visits.remove(name);
                Err(err)
            }
        }
    }

    fn install_package(&self, name: &str, run: &mut InstallRun<'_>) -> Result<InstallOutcome> {
        let source_dir = self.layout.source_dir(name);
        if !source_dir.is_dir() {
            return Err(InstallError::PackageNotFound {
                name: name.to_string(),
                path: source_dir,
            });
        }

        let source_manifest = self.layout.source_manifest_path(name);
        let raw = fs::read_to_string(&source_manifest).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                InstallError::PackageNotFound {
                    name: name.to_string(),
                    path: source_manifest.clone(),
                }
            } else {
                InstallError::store_io(&source_manifest, err)
            }
        })?;

        let manifest_path = self.store.import_manifest(name, &raw)?;
        let Some(mut descriptor) = self.store.load(name)? else {
            return Err(InstallError::PackageNotFound {
                name: name.to_string(),
                path: manifest_path,
            });
        };
        if descriptor.name != name {
            warn!(
                package = name,
                manifest_name = %descriptor.name,
                "manifest name differs from package directory; store record keyed by directory"
            );
        }

        descriptor.set_owner(run.scope);
        self.store.save(name, &descriptor)?;
        debug!(package = name, owner = run.scope.owner_tag(), "recorded owner");

        for dependency in &descriptor.dependencies {
            self.install_one(dependency, run)
                .map_err(|err| InstallError::DependencyFailed {
                    name: name.to_string(),
                    dependency: dependency.clone(),
                    source: Box::new(err),
                })?;
        }

        let mut outcome = InstallOutcome {
            name: name.to_string(),
            version: descriptor.version.clone(),
            installed_path: descriptor.installed_path().map(str::to_string),
            script_ran: false,
            profile: None,
        };

        let Some(script) = descriptor.install_script() else {
            info!(package = name, "no install script; metadata recorded");
            return Ok(outcome);
        };

        let script_path = source_dir.join(script);
        self.executor.run(ScriptInvocation {
            package: name,
            script: &script_path,
            manifest: &manifest_path,
            package_dir: &source_dir,
            scope: run.scope,
        })?;
        outcome.script_ran = true;

        if let Some(installed_path) = descriptor.installed_path() {
            let profile = self.layout.profile_path(run.scope);
            outcome.profile = Some(append_path(&profile, installed_path)?);
        } else {
            info!(package = name, "installed_path not set; PATH unchanged");
        }

        info!(package = name, version = %descriptor.version, scope = %run.scope, "installed");
        Ok(outcome)
    }
}
