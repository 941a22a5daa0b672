//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Loads the manifest and constructs the host
//! 3. Runs the pipeline and formats output
//!
//! # Async Commands
//!
//! The publish and sync-body handlers are async because they involve network
//! I/O; each constructs a tokio runtime and blocks on its async body.

mod completion;
mod publish;
mod sync_body;

pub use completion::completion;
pub use publish::{publish, PublishArgs};
pub use sync_body::{sync_body, SyncBodyArgs};

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::args::Command;
use crate::cli::Context;
use crate::core::config::MANIFEST_FILE_NAME;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Publish {
            manifest,
            token,
            api_url,
            staging,
            dry_run,
        } => publish(
            ctx,
            PublishArgs {
                manifest,
                token,
                api_url,
                staging,
                dry_run,
            },
        ),
        Command::SyncBody {
            manifest,
            token,
            api_url,
            file,
        } => sync_body(
            ctx,
            SyncBodyArgs {
                manifest,
                token,
                api_url,
                file,
            },
        ),
        Command::Completion { shell } => completion(shell),
    }
}

/// Resolve the manifest path from the explicit flag and the working
/// directory, defaulting to `modpub.toml`.
pub(crate) fn manifest_path(ctx: &Context, explicit: Option<&Path>) -> PathBuf {
    let base = ctx.cwd.clone().unwrap_or_default();
    match explicit {
        Some(path) => base.join(path),
        None => base.join(MANIFEST_FILE_NAME),
    }
}
