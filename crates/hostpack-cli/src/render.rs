use std::io::IsTerminal;

use anstyle::{AnsiColor, Effects, Style};
use hostpack_installer::{InstallReport, ProfileUpdate, UninstallReport};
use hostpack_registry::{RepoSyncResult, RepoSyncStatus};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style(force_plain: bool) -> OutputStyle {
    if force_plain || std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal() {
        OutputStyle::Plain
    } else {
        OutputStyle::Rich
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => {
            let (badge, badge_style) = status_badge(status);
            format!("{} {message}", colorize(badge_style, badge))
        }
    }
}

pub(crate) fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

pub(crate) fn format_install_lines(report: &InstallReport, style: OutputStyle) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.packages.len() + report.deduplicated.len());
    for outcome in &report.packages {
        let mut message = format!("installed {}", package_label(&outcome.name, &outcome.version));
        if !outcome.script_ran {
            message.push_str(" (metadata only)");
        }
        let status = match (&outcome.profile, &outcome.installed_path) {
            (Some(ProfileUpdate::Appended), Some(path)) => {
                message.push_str(&format!("; added {path} to PATH"));
                "ok"
            }
            (Some(ProfileUpdate::AlreadyPresent), Some(path)) => {
                message.push_str(&format!("; {path} already on PATH"));
                "ok"
            }
            (Some(ProfileUpdate::MissingProfile), Some(path)) => {
                message.push_str(&format!("; profile not found, {path} not added to PATH"));
                "warn"
            }
            _ => "ok",
        };
        lines.push(render_status_line(style, status, &message));
    }
    for name in &report.deduplicated {
        lines.push(render_status_line(
            style,
            "skip",
            &format!("{name} already installed in this run"),
        ));
    }
    lines
}

pub(crate) fn format_uninstall_lines(report: &UninstallReport, style: OutputStyle) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(path) = &report.installed_path {
        let (status, message) = match report.profile {
            Some(ProfileUpdate::Removed(0)) => ("skip", format!("{path} was not on PATH")),
            Some(ProfileUpdate::Removed(_)) => ("ok", format!("removed {path} from PATH")),
            Some(ProfileUpdate::MissingProfile) => {
                ("warn", format!("profile not found, {path} left untouched"))
            }
            _ => ("ok", format!("{path} PATH entry unchanged")),
        };
        lines.push(render_status_line(style, status, &message));
        if report.removed_installed_path {
            lines.push(render_status_line(style, "ok", &format!("deleted {path}")));
        }
    }
    lines.push(render_status_line(
        style,
        "ok",
        &format!(
            "uninstalled {}",
            package_label(&report.name, &report.version)
        ),
    ));
    lines
}

pub(crate) fn format_list_lines(names: &[String]) -> Vec<String> {
    if names.is_empty() {
        return vec!["No installed packages".to_string()];
    }
    let mut lines = vec!["Installed packages:".to_string()];
    lines.extend(names.iter().cloned());
    lines
}

pub(crate) fn format_sync_lines(results: &[RepoSyncResult], style: OutputStyle) -> Vec<String> {
    results
        .iter()
        .map(|result| match result.status {
            RepoSyncStatus::Synced => render_status_line(
                style,
                "ok",
                &format!("{}: synced", result.path.display()),
            ),
            RepoSyncStatus::Failed => render_status_line(
                style,
                "err",
                &format!(
                    "{}: failed ({})",
                    result.path.display(),
                    result.error.as_deref().unwrap_or("unknown error")
                ),
            ),
        })
        .collect()
}

fn package_label(name: &str, version: &str) -> String {
    if version.is_empty() {
        name.to_string()
    } else {
        format!("{name} {version}")
    }
}

fn status_badge(status: &str) -> (&'static str, Style) {
    match status {
        "ok" => ("[OK]", Style::new().fg_color(Some(AnsiColor::Green.into()))),
        "warn" => ("[WARN]", Style::new().fg_color(Some(AnsiColor::Yellow.into()))),
        "err" => (
            "[ERR]",
            Style::new()
                .fg_color(Some(AnsiColor::Red.into()))
                .effects(Effects::BOLD),
        ),
        "skip" => ("[..]", Style::new().fg_color(Some(AnsiColor::BrightBlack.into()))),
        _ => ("[..]", Style::new()),
    }
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
