//! sync-body command - Replace the project body with a local Markdown file

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};

use crate::cli::commands::manifest_path;
use crate::cli::Context;
use crate::core::config::Manifest;
use crate::host::modrinth::ModrinthHost;
use crate::host::{HostError, ModHost};
use crate::resolve;
use crate::ui::output;

/// Options for the sync-body command.
#[derive(Debug, Default)]
pub struct SyncBodyArgs {
    pub manifest: Option<PathBuf>,
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub file: Option<PathBuf>,
}

/// Replace the project description with a local Markdown file.
pub fn sync_body(ctx: &Context, args: SyncBodyArgs) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(sync_body_async(ctx, args))
}

async fn sync_body_async(ctx: &Context, args: SyncBodyArgs) -> Result<()> {
    let path = manifest_path(ctx, args.manifest.as_deref());
    let loaded = Manifest::load(&path)
        .with_context(|| format!("failed to load manifest '{}'", path.display()))?;
    let manifest = &loaded.manifest;

    let project = match &manifest.project {
        Some(project) => project.clone(),
        None => bail!("no project specified in the manifest"),
    };

    let body_path = match args.file {
        Some(file) => file,
        None => match &manifest.sync_body_from {
            Some(file) => loaded.base_dir().join(file),
            None => bail!("no body file: pass --file or set sync_body_from in the manifest"),
        },
    };
    let body = fs::read_to_string(&body_path)
        .with_context(|| format!("failed to read body file '{}'", body_path.display()))?;

    let token = manifest
        .resolve_token(args.token)
        .ok_or(HostError::AuthRequired)
        .context("pass --token, set the manifest's token field, or export MODRINTH_TOKEN")?;

    let host = match args.api_url.or_else(|| manifest.api_url.clone()) {
        Some(base) => ModrinthHost::with_api_base(token, base)?,
        None => ModrinthHost::new(token)?,
    };

    let resolved = resolve::resolve_project(&host, &project).await?;
    host.update_project_body(&resolved.id, &body).await?;

    output::success(
        format!("updated body of project {}", resolved.id),
        ctx.verbosity,
    );
    Ok(())
}
