use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracklog_core::{ChecksumMode, Config, HashAlgorithm, RevertTarget};

mod commands;

use commands::{add, check, commit, init, log, ls, revert, walkthrough};

#[derive(Parser)]
#[command(name = "tracklog")]
#[command(version, about = "Minimal versioned-file tracker", long_about = None)]
struct Cli {
    /// Repository directory
    #[arg(short, long, global = true, default_value = ".")]
    repo: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new repository directory with an empty commit log
    Init {
        /// Directory to create (defaults to --repo)
        path: Option<PathBuf>,

        /// Content hash algorithm: fast or sha256
        #[arg(long, default_value = "fast", value_parser = parse_hash)]
        hash: HashAlgorithm,

        /// Integrity checksum mode: stored or literal
        #[arg(long, default_value = "stored", value_parser = parse_checksum)]
        checksum: ChecksumMode,

        /// Record a revert must match: earliest or most-recent
        #[arg(long, default_value = "earliest", value_parser = parse_revert_target)]
        revert_target: RevertTarget,
    },

    /// Add files with their baseline content
    Add {
        /// File names inside the repository
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// List tracked files
    Ls,

    /// Record the current content of a file
    Commit {
        /// File name inside the repository
        file: String,

        /// Replace the file content before committing
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Show commit history
    Log {
        /// Only show commits for this file
        #[arg(short, long)]
        file: Option<String>,

        /// Number of commits to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Revert a file to its baseline content
    Revert {
        /// File name inside the repository
        file: String,

        /// Actually perform the revert (without this, just shows preview)
        #[arg(long)]
        execute: bool,
    },

    /// Check the commit log for duplicates and checksum drift
    Check,

    /// Interactive init → add → commit → revert → check session
    Walkthrough,
}

fn parse_hash(s: &str) -> std::result::Result<HashAlgorithm, String> {
    HashAlgorithm::parse(s).ok_or_else(|| format!("unknown hash algorithm: {}", s))
}

fn parse_checksum(s: &str) -> std::result::Result<ChecksumMode, String> {
    ChecksumMode::parse(s).ok_or_else(|| format!("unknown checksum mode: {}", s))
}

fn parse_revert_target(s: &str) -> std::result::Result<RevertTarget, String> {
    RevertTarget::parse(s).ok_or_else(|| format!("unknown revert target: {}", s))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            path,
            hash,
            checksum,
            revert_target,
        } => {
            let config = Config::default()
                .with_hash(hash)
                .with_checksum(checksum)
                .with_revert_target(revert_target);
            init::run(path.unwrap_or(cli.repo), config)?;
        }
        Commands::Add { files } => {
            add::run(&cli.repo, &files)?;
        }
        Commands::Ls => {
            ls::run(&cli.repo)?;
        }
        Commands::Commit { file, content } => {
            commit::run(&cli.repo, &file, content)?;
        }
        Commands::Log { file, limit, json } => {
            log::run(&cli.repo, file.as_deref(), limit, json)?;
        }
        Commands::Revert { file, execute } => {
            revert::run(&cli.repo, &file, execute)?;
        }
        Commands::Check => {
            check::run(&cli.repo)?;
        }
        Commands::Walkthrough => {
            walkthrough::run()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_init_options() {
        let cli = Cli::try_parse_from([
            "tracklog",
            "init",
            "repo1",
            "--hash",
            "sha256",
            "--revert-target",
            "most-recent",
        ])
        .unwrap();

        match cli.command {
            Commands::Init {
                path,
                hash,
                checksum,
                revert_target,
            } => {
                assert_eq!(path, Some(PathBuf::from("repo1")));
                assert_eq!(hash, HashAlgorithm::Sha256);
                assert_eq!(checksum, ChecksumMode::Stored);
                assert_eq!(revert_target, RevertTarget::MostRecent);
            }
            _ => panic!("expected init"),
        }
    }

    #[test]
    fn test_rejects_unknown_hash() {
        assert!(Cli::try_parse_from(["tracklog", "init", "--hash", "md5"]).is_err());
    }

    #[test]
    fn test_global_repo_flag() {
        let cli =
            Cli::try_parse_from(["tracklog", "revert", "notes.txt", "--repo", "repo1"]).unwrap();

        assert_eq!(cli.repo, PathBuf::from("repo1"));
        assert!(matches!(
            cli.command,
            Commands::Revert { execute: false, .. }
        ));
    }
}
