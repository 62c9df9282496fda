use std::path::Path;

use anyhow::{Context, Result};
use hostpack_core::Scope;
use hostpack_installer::{
    load_host_config, load_preamble, regenerate_world, FsStore, HostConfig, HostLayout, Installer,
    ScriptExecutor, ScriptIdentity,
};
use hostpack_registry::{clone_repository, sync_all, sync_repository, RepositoryCatalog};
use tracing::debug;

use crate::completion::write_completions_script;
use crate::render::{
    format_install_lines, format_list_lines, format_sync_lines, format_uninstall_lines,
    print_lines, render_status_line, OutputStyle,
};
use crate::{Cli, Commands, HostCommand, ScopeArgs};

pub(crate) fn run_cli(cli: Cli, style: OutputStyle) -> Result<()> {
    let command = match &cli.command {
        Commands::Completions { shell } => {
            let mut stdout = std::io::stdout();
            return write_completions_script(*shell, &mut stdout);
        }
        Commands::Host(command) => command,
    };

    let layout = HostLayout::new(&cli.root);
    let installer = build_installer(&cli, &layout)?;

    let primary = run_command(command, &installer, style);
    let world = report_world(&layout, style);
    match (primary, world) {
        (Err(primary), Err(world)) => {
            eprintln!("{}", render_status_line(style, "err", &format!("{world:#}")));
            Err(primary)
        }
        (Err(primary), Ok(())) => Err(primary),
        (Ok(()), world) => world,
    }
}

/// Reads configuration, the script preamble and the execution identity once
/// for the whole invocation. Failures here are fatal.
pub(crate) fn build_installer(cli: &Cli, layout: &HostLayout) -> Result<Installer> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| layout.config_path());
    let config = load_host_config(&config_path)?;
    let config = apply_cli_overrides(config, cli.script_user.as_deref());
    debug!(
        config = %config_path.display(),
        script_user = %config.script_user,
        shell = %config.shell,
        "loaded host configuration"
    );

    let preamble = load_preamble(&layout.preamble_path())?;
    let identity = ScriptIdentity::resolve(&config.script_user);
    let executor = ScriptExecutor::new(config.shell, preamble, identity);
    Ok(Installer::with_fs_store(layout.clone(), executor))
}

pub(crate) fn apply_cli_overrides(mut config: HostConfig, script_user: Option<&str>) -> HostConfig {
    if let Some(script_user) = script_user {
        config.script_user = script_user.to_string();
    }
    config
}

fn run_command(command: &HostCommand, installer: &Installer, style: OutputStyle) -> Result<()> {
    let layout = installer.layout();
    match command {
        HostCommand::Install { name, scope } => {
            let scope = resolve_scope(scope)?;
            layout.ensure_base_dirs()?;
            let report = installer
                .install(name, &scope)
                .with_context(|| format!("installation of '{name}' failed"))?;
            print_lines(&format_install_lines(&report, style));
        }
        HostCommand::Uninstall { name, scope } => {
            let scope = resolve_scope(scope)?;
            let report = installer
                .uninstall(name, &scope)
                .with_context(|| format!("uninstallation of '{name}' failed"))?;
            print_lines(&format_uninstall_lines(&report, style));
        }
        HostCommand::List => {
            let names = installer.list()?;
            print_lines(&format_list_lines(&names));
        }
        HostCommand::Clone { url } => {
            let catalog = default_catalog(layout, None);
            let path = clone_repository(url, &layout.repos_dir(), &catalog)?;
            println!(
                "{}",
                render_status_line(style, "ok", &format!("cloned {url} into {}", path.display()))
            );
        }
        HostCommand::Sync { path } => {
            let path = path.clone().unwrap_or_else(|| layout.repos_dir());
            sync_repository(&path)?;
            println!(
                "{}",
                render_status_line(style, "ok", &format!("synced {}", path.display()))
            );
        }
        HostCommand::SyncAll { list } => {
            let catalog = default_catalog(layout, list.as_deref());
            let results = sync_all(&catalog)?;
            print_lines(&format_sync_lines(&results, style));
            let failed = results
                .iter()
                .filter(|result| result.error.is_some())
                .count();
            if failed > 0 {
                anyhow::bail!("{failed} of {} repositories failed to sync", results.len());
            }
        }
        HostCommand::World => {}
    }
    Ok(())
}

fn report_world(layout: &HostLayout, style: OutputStyle) -> Result<()> {
    let store = FsStore::new(layout.clone());
    let snapshot = regenerate_world(layout, &store)?;
    println!(
        "{}",
        render_status_line(
            style,
            "ok",
            &format!(
                "world file generated: {} ({} packages)",
                snapshot.path.display(),
                snapshot.lines.len()
            )
        )
    );
    Ok(())
}

pub(crate) fn resolve_scope(args: &ScopeArgs) -> Result<Scope> {
    match (&args.user, args.system) {
        (Some(user), false) => Scope::user(user.as_str()).context("invalid --user"),
        (None, true) => Ok(Scope::SystemWide),
        _ => anyhow::bail!("choose exactly one of --system or --user <USER>"),
    }
}

fn default_catalog(layout: &HostLayout, list_override: Option<&Path>) -> RepositoryCatalog {
    let list_path = list_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| layout.repos_list_path());
    RepositoryCatalog::new(list_path, layout.repos_json_path())
}
