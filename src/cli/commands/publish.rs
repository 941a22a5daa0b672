//! publish command - Run the full publish pipeline

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::commands::manifest_path;
use crate::cli::Context;
use crate::core::config::Manifest;
use crate::host::modrinth::{ModrinthHost, STAGING_API_BASE};
use crate::host::HostError;
use crate::publish::{PublishOptions, PublishOutcome, Publisher};
use crate::ui::output;

/// Options for the publish command.
#[derive(Debug, Default)]
pub struct PublishArgs {
    pub manifest: Option<PathBuf>,
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub staging: bool,
    pub dry_run: bool,
}

/// Run the publish pipeline against the configured host.
pub fn publish(ctx: &Context, args: PublishArgs) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(publish_async(ctx, args))
}

async fn publish_async(ctx: &Context, args: PublishArgs) -> Result<()> {
    let path = manifest_path(ctx, args.manifest.as_deref());
    let loaded = Manifest::load(&path)
        .with_context(|| format!("failed to load manifest '{}'", path.display()))?;
    let manifest = &loaded.manifest;

    let token = manifest
        .resolve_token(args.token)
        .ok_or(HostError::AuthRequired)
        .context("pass --token, set the manifest's token field, or export MODRINTH_TOKEN")?;

    let host = match resolve_api_base(manifest, &args.api_url, args.staging) {
        Some(base) => ModrinthHost::with_api_base(token, base)?,
        None => ModrinthHost::new(token)?,
    };
    output::debug(format!("using API base {}", host.api_base()), ctx.verbosity);

    let options = PublishOptions {
        fail_silently: manifest.fail_silently.unwrap_or(false),
        debug_mode: args.dry_run || manifest.debug_mode.unwrap_or(false),
        detect_loaders: manifest.detect_loaders.unwrap_or(true),
        strict_versioning: manifest.strict_versioning.unwrap_or(false),
    };

    let metadata = manifest.to_metadata(loaded.base_dir());
    let env = manifest.environment();

    let publisher = Publisher::new(&host, &env, options, ctx.verbosity);
    match publisher.run(metadata).await? {
        PublishOutcome::Published(receipt) => {
            if let Some(url) = &receipt.primary_url {
                output::print(url, ctx.verbosity);
            }
            Ok(())
        }
        PublishOutcome::DryRun(data) => {
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(())
        }
        // A downgraded failure was already reported as a warning.
        PublishOutcome::Failed(_) => Ok(()),
    }
}

fn resolve_api_base(
    manifest: &Manifest,
    flag: &Option<String>,
    staging: bool,
) -> Option<String> {
    if let Some(url) = flag {
        Some(url.clone())
    } else if staging {
        Some(STAGING_API_BASE.to_string())
    } else {
        manifest.api_url.clone()
    }
}
