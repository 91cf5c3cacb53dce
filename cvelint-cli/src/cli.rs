//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// cvelint -- lint and normalize cvebase markdown documents.
///
/// Use `cvelint <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "cvelint", version, about, long_about = None)]
pub struct Cli {
    /// Path to the cvelint.toml configuration file (missing file means defaults).
    #[arg(short, long, default_value = "cvelint.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lint and normalize documents (whole tree, or one commit with -c).
    Lint(LintArgs),

    /// Export vulnerabilities with proof-of-concept links as NDJSON.
    Export(ExportArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

/// Repository selection shared by `lint` and `export`.
#[derive(Args, Debug)]
pub struct RepoArgs {
    /// Repository checkout path (default: repository.path from config).
    #[arg(short, long)]
    pub repo: Option<PathBuf>,

    /// Clone the repository first (the target directory must not exist).
    #[arg(long = "clone")]
    pub clone_repo: bool,

    /// Fast-forward the repository from origin before running.
    #[arg(long)]
    pub pull: bool,
}

// ---- lint ----

/// Lint documents in the content repository.
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Lint only files added or modified by this commit.
    #[arg(short, long)]
    pub commit: Option<String>,

    /// Worker count for a full sweep (default: lint.max_workers from config).
    #[arg(short, long)]
    pub workers: Option<usize>,

    #[command(flatten)]
    pub repo: RepoArgs,
}

// ---- export ----

/// Write the proof-of-concept export artifact.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file path.
    #[arg(short = 'o', long = "out")]
    pub out: PathBuf,

    #[command(flatten)]
    pub repo: RepoArgs,
}

// ---- config ----

/// Manage cvelint configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, repository, lint, export).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_lint_defaults() {
        let cli = Cli::try_parse_from(["cvelint", "lint"]).expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("cvelint.toml"));
        match cli.command {
            Commands::Lint(args) => {
                assert!(args.commit.is_none(), "commit should default to None");
                assert!(args.workers.is_none());
                assert!(args.repo.repo.is_none());
                assert!(!args.repo.clone_repo);
                assert!(!args.repo.pull);
            }
            _ => panic!("expected Lint command"),
        }
    }

    #[test]
    fn test_cli_parse_lint_commit_and_repo() {
        let cli = Cli::try_parse_from([
            "cvelint",
            "lint",
            "-c",
            "HEAD~1",
            "-r",
            "/srv/cvebase.com",
            "-w",
            "8",
            "--pull",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Lint(args) => {
                assert_eq!(args.commit.as_deref(), Some("HEAD~1"));
                assert_eq!(args.repo.repo, Some(PathBuf::from("/srv/cvebase.com")));
                assert_eq!(args.workers, Some(8));
                assert!(args.repo.pull);
            }
            _ => panic!("expected Lint command"),
        }
    }

    #[test]
    fn test_cli_parse_config_short_flag_before_subcommand() {
        let cli = Cli::try_parse_from(["cvelint", "-c", "/etc/cvelint.toml", "lint", "-c", "abc123"])
            .expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("/etc/cvelint.toml"));
        match cli.command {
            Commands::Lint(args) => assert_eq!(args.commit.as_deref(), Some("abc123")),
            _ => panic!("expected Lint command"),
        }
    }

    #[test]
    fn test_cli_parse_lint_clone() {
        let cli = Cli::try_parse_from(["cvelint", "lint", "--clone"]).expect("parse succeeded");
        match cli.command {
            Commands::Lint(args) => assert!(args.repo.clone_repo),
            _ => panic!("expected Lint command"),
        }
    }

    #[test]
    fn test_cli_parse_lint_invalid_workers_fails() {
        let args = Cli::try_parse_from(["cvelint", "lint", "-w", "many"]);
        assert!(args.is_err(), "non-numeric worker count should fail");
    }

    #[test]
    fn test_cli_parse_export_requires_output() {
        let args = Cli::try_parse_from(["cvelint", "export"]);
        assert!(args.is_err(), "export without -o should fail");
    }

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::try_parse_from(["cvelint", "export", "-o", "pocs.ndjson", "--clone"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.out, PathBuf::from("pocs.ndjson"));
                assert!(args.repo.clone_repo);
            }
            _ => panic!("expected Export command"),
        }
    }

    #[test]
    fn test_cli_parse_export_long_flag_and_json_output() {
        let cli = Cli::try_parse_from([
            "cvelint", "export", "--out", "out.ndjson", "--output", "json",
        ])
        .expect("parse succeeded");
        assert!(matches!(cli.output, OutputFormat::Json));
        match cli.command {
            Commands::Export(args) => assert_eq!(args.out, PathBuf::from("out.ndjson")),
            _ => panic!("expected Export command"),
        }
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["cvelint", "config", "show", "--section", "lint"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => match config_args.action {
                ConfigAction::Show { section } => {
                    assert_eq!(section, Some("lint".to_owned()));
                }
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_config_validate() {
        let cli = Cli::try_parse_from(["cvelint", "config", "validate"]).expect("parse succeeded");
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigArgs {
                action: ConfigAction::Validate
            })
        ));
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["cvelint", "lint", "--log-level", "debug", "--output", "json"])
            .expect("parse succeeded");
        assert_eq!(cli.log_level, Some("debug".to_owned()));
        assert!(matches!(cli.output, OutputFormat::Json));
    }

    #[test]
    fn test_cli_parse_missing_command_fails() {
        let args = Cli::try_parse_from(["cvelint"]);
        assert!(args.is_err(), "should fail when no command provided");
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "cvelint");

        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        for name in ["lint", "export", "config"] {
            assert!(subcommands.contains(&name), "should have '{name}' subcommand");
        }
    }
}
