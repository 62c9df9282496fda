use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod completion;
mod dispatch;
mod render;

use dispatch::run_cli;
use render::{current_output_style, render_status_line};

#[derive(Parser, Debug)]
#[command(name = "hostpack")]
#[command(about = "Host-level package installer", long_about = None)]
struct Cli {
    /// Root the fixed /packages, /etc and /home layout is resolved under.
    #[arg(long, global = true, default_value = "/")]
    root: PathBuf,
    /// Host configuration file (defaults to <root>/etc/hostpack.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Account user-scoped install scripts run as.
    #[arg(long, global = true, value_name = "USER")]
    script_user: Option<String>,
    /// Disable status badges and colors.
    #[arg(long, global = true)]
    plain: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Host(HostCommand),
    /// Print a shell completion script.
    Completions { shell: Shell },
}

/// Commands that act on the host and are followed by world regeneration.
#[derive(Subcommand, Debug)]
enum HostCommand {
    /// Install a package and its dependencies.
    Install {
        name: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Remove a package's PATH entry, installed tree and store record.
    Uninstall {
        name: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// List installed packages.
    List,
    /// Clone a package repository into the repos directory.
    Clone { url: String },
    /// Pull one repository (defaults to <root>/packages/repos).
    Sync { path: Option<PathBuf> },
    /// Pull every repository in repos.list and repos.json.
    SyncAll {
        #[arg(long)]
        list: Option<PathBuf>,
    },
    /// Only regenerate the world file.
    World,
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
struct ScopeArgs {
    /// Install for every user of the host.
    #[arg(short = 's', long)]
    system: bool,
    /// Install for a single user.
    #[arg(short = 'u', long, value_name = "USER")]
    user: Option<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let style = current_output_style(cli.plain);

    match run_cli(cli, style) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", render_status_line(style, "err", &format!("{err:#}")));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
