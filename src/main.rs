//! Blueprint CLI
//!
//! Usage: blueprint [--root DIR] [--json] [-v] <COMMAND>
//!
//! Commands:
//!   check        Validate every artifact and rebuild reports
//!   build        Run the pipeline for one artifact
//!   diagnostics  Show stored diagnostics
//!   apply        Apply a quick-fix suggestion
//!   report       Show generated reports
//!   watch        Keep diagnostics and reports current while files change

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the default level
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let root = commands::resolve_root(cli.root.as_deref())?;
    match cli.command {
        Commands::Check { strict_warnings } => commands::check::cmd_check(&root, strict_warnings, cli.json),
        Commands::Build { path } => commands::build::cmd_build(&root, &path, cli.json),
        Commands::Diagnostics { path, fixable } => {
            commands::diagnostics::cmd_diagnostics(&root, path.as_deref(), fixable, cli.json)
        }
        Commands::Apply {
            path,
            code,
            location,
        } => commands::apply::cmd_apply(&root, &path, &code, location.as_deref(), cli.json),
        Commands::Report { path, open } => {
            commands::report::cmd_report(&root, path.as_deref(), open, cli.json)
        }
        Commands::Watch => commands::watch::cmd_watch(&root, cli.json),
    }
}
