use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Blueprint - incremental validation and reports for design artifacts
#[derive(Parser, Debug)]
#[command(name = "blueprint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Workspace root (defaults to the nearest directory with blueprint.toml or .git)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Output format for CI (NDJSON)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate every artifact, rebuild reports and summarize diagnostics
    Check {
        /// Fail on warnings too (CI mode)
        #[arg(long)]
        strict_warnings: bool,
    },

    /// Run the full pipeline for one artifact
    Build {
        /// Artifact path (workspace-relative or on disk)
        path: String,
    },

    /// Show stored diagnostics
    Diagnostics {
        /// Only diagnostics of this artifact
        path: Option<String>,

        /// Only diagnostics offering a quick-fix
        #[arg(long)]
        fixable: bool,
    },

    /// Apply a quick-fix suggestion to an artifact
    Apply {
        /// Artifact path (workspace-relative or on disk)
        path: String,

        /// Suggestion code, e.g. create-missing
        code: String,

        /// Location inside the artifact, dotted (supersedes.0)
        #[arg(long)]
        location: Option<String>,
    },

    /// Show the reports generated for an artifact (or the workspace)
    Report {
        /// Artifact path; omit for workspace-wide reports
        path: Option<String>,

        /// Print the main report's content instead of listing paths
        #[arg(long)]
        open: bool,
    },

    /// Watch the workspace and keep diagnostics and reports current
    Watch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["blueprint", "check", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Check { strict_warnings: false }));
    }

    #[test]
    fn test_cli_apply_takes_location() {
        let cli = Cli::try_parse_from([
            "blueprint",
            "--root",
            "/tmp/ws",
            "apply",
            "decisions/0002.decision",
            "create-missing",
            "--location",
            "supersedes.0",
        ])
        .unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/ws")));
        match cli.command {
            Commands::Apply {
                path,
                code,
                location,
            } => {
                assert_eq!(path, "decisions/0002.decision");
                assert_eq!(code, "create-missing");
                assert_eq!(location.as_deref(), Some("supersedes.0"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["blueprint"]).is_err());
    }
}
