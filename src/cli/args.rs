//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// modpub - Publish mod artifacts to Modrinth
#[derive(Parser, Debug)]
#[command(name = "modpub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if modpub was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a new version of a project
    #[command(
        name = "publish",
        long_about = "Upload a new version of a project.\n\n\
            Reads the modpub.toml manifest, fills unset metadata from the \
            declared build environment, resolves project and dependency \
            references to canonical IDs, and uploads the artifacts as one \
            multipart request. Nothing is retried on failure.",
        after_help = "\
EXAMPLES:
    # Publish using ./modpub.toml and the MODRINTH_TOKEN environment variable
    modpub publish

    # Preview the upload body without sending anything
    modpub publish --dry-run

    # Publish against the staging API
    modpub publish --staging"
    )]
    Publish {
        /// Manifest path (default: modpub.toml in the working directory)
        #[arg(long, value_name = "PATH")]
        manifest: Option<PathBuf>,

        /// API token (overrides the manifest and MODRINTH_TOKEN)
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,

        /// API base URL (overrides the manifest)
        #[arg(long, value_name = "URL", conflicts_with = "staging")]
        api_url: Option<String>,

        /// Target the staging API instead of production
        #[arg(long)]
        staging: bool,

        /// Build and print the upload body without sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Replace the project body with a local Markdown file
    #[command(
        name = "sync-body",
        long_about = "Replace the project description with the contents of a \
            local Markdown file.\n\n\
            The file comes from the manifest's sync_body_from field unless \
            overridden with --file."
    )]
    SyncBody {
        /// Manifest path (default: modpub.toml in the working directory)
        #[arg(long, value_name = "PATH")]
        manifest: Option<PathBuf>,

        /// API token (overrides the manifest and MODRINTH_TOKEN)
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,

        /// API base URL (overrides the manifest)
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,

        /// Markdown file (overrides the manifest's sync_body_from)
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
