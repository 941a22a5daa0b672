//! publish
//!
//! The publish orchestrator: one-shot pipeline from metadata to an uploaded
//! version.
//!
//! # Stages
//!
//! Each invocation moves through fixed stages in order, with no retries and
//! no backward transitions:
//!
//! 1. Defaulting: fill unset fields, probe the environment for empty sets
//! 2. Validating: gate on the completed record
//! 3. Resolving identifiers: project and dependency references to IDs
//! 4. Resolving files: references to bytes, digested in the same pass
//! 5. Building: assemble the wire body and attachment parts
//! 6. Transporting: the multipart upload
//!
//! A failure carries the stage it happened in. With `fail_silently` set, a
//! failure downgrades to a warning and a `Failed` outcome instead of an
//! error; nothing is retried either way.

pub mod request;

use std::fmt;

use thiserror::Error;

use crate::core::artifact::{self, ArtifactError, LoadedArtifact};
use crate::core::metadata::PublishMetadata;
use crate::host::{HostError, ModHost, VersionData};
use crate::probe::{self, BuildEnvironment};
use crate::resolve;
use crate::ui::output;
use crate::ui::Verbosity;

/// Pipeline stage, carried on failures for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Defaulting,
    Validating,
    ResolvingIdentifiers,
    ResolvingFiles,
    Building,
    Transporting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Defaulting => "defaulting",
            Stage::Validating => "validating",
            Stage::ResolvingIdentifiers => "resolving identifiers",
            Stage::ResolvingFiles => "resolving files",
            Stage::Building => "building request",
            Stage::Transporting => "uploading",
        };
        f.write_str(name)
    }
}

/// Errors from the publish pipeline.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The metadata record failed validation.
    #[error("invalid publish configuration: {0}")]
    InvalidConfig(String),

    /// An artifact could not be resolved or read.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// The remote service failed or rejected the request.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// A pipeline failure, annotated with the stage it happened in.
#[derive(Debug, Error)]
#[error("publish failed while {stage}: {error}")]
pub struct PublishFailure {
    /// Stage the pipeline was in.
    pub stage: Stage,
    /// The underlying error, already part of the display message.
    pub error: PublishError,
}

impl PublishFailure {
    fn new(stage: Stage, error: impl Into<PublishError>) -> Self {
        Self {
            stage,
            error: error.into(),
        }
    }
}

/// Proof of a completed upload.
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    /// ID of the created version.
    pub version_id: String,
    /// Canonical ID of the project it was created under.
    pub project_id: String,
    /// Download URL of the primary file, when the service reported one.
    pub primary_url: Option<String>,
}

/// Terminal outcome of one publish invocation.
#[derive(Debug)]
pub enum PublishOutcome {
    /// The version was uploaded.
    Published(PublishReceipt),
    /// Debug mode: the body that would have been uploaded.
    DryRun(VersionData),
    /// A failure downgraded by `fail_silently`.
    Failed(PublishFailure),
}

/// Behavior toggles for one invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishOptions {
    /// Downgrade failures to warnings.
    pub fail_silently: bool,
    /// Build the body but skip the upload.
    pub debug_mode: bool,
    /// Probe the environment for loaders when none are declared.
    pub detect_loaders: bool,
    /// Require a semver-shaped version number.
    pub strict_versioning: bool,
}

/// One-shot publish orchestrator.
///
/// Holds the collaborators for a single invocation; nothing is cached
/// between runs.
pub struct Publisher<'a> {
    host: &'a dyn ModHost,
    env: &'a dyn BuildEnvironment,
    options: PublishOptions,
    verbosity: Verbosity,
}

impl<'a> Publisher<'a> {
    /// Create a publisher over a host and build environment.
    pub fn new(
        host: &'a dyn ModHost,
        env: &'a dyn BuildEnvironment,
        options: PublishOptions,
        verbosity: Verbosity,
    ) -> Self {
        Self {
            host,
            env,
            options,
            verbosity,
        }
    }

    /// Run the pipeline to completion.
    ///
    /// # Errors
    ///
    /// Returns the stage-annotated failure, unless `fail_silently` is set,
    /// in which case the failure is reported as a warning and returned as a
    /// [`PublishOutcome::Failed`].
    pub async fn run(&self, metadata: PublishMetadata) -> Result<PublishOutcome, PublishFailure> {
        match self.execute(metadata).await {
            Ok(outcome) => Ok(outcome),
            Err(failure) if self.options.fail_silently => {
                output::warn(&failure, self.verbosity);
                Ok(PublishOutcome::Failed(failure))
            }
            Err(failure) => Err(failure),
        }
    }

    async fn execute(
        &self,
        mut metadata: PublishMetadata,
    ) -> Result<PublishOutcome, PublishFailure> {
        // Defaulting. Probing fills only empty sets; explicit values are
        // never overwritten.
        metadata.default_version_number(self.env.project_version());
        metadata.default_version_name();
        metadata.default_changelog();
        if metadata.game_versions.is_empty() {
            let detected = probe::detect_game_versions(self.env);
            if !detected.is_empty() {
                output::debug(
                    format!("detected game versions: {}", detected.join(", ")),
                    self.verbosity,
                );
                metadata.merge_game_versions(detected);
            }
        }
        if metadata.loaders.is_empty() && self.options.detect_loaders {
            let detected = probe::detect_loaders(self.env);
            if !detected.is_empty() {
                output::debug(
                    format!("detected loaders: {}", detected.join(", ")),
                    self.verbosity,
                );
                metadata.merge_loaders(detected);
            }
        }

        // Validation gate. Everything after this point treats the record as
        // read-only.
        if metadata.project.is_empty() {
            return Err(PublishFailure::new(
                Stage::Validating,
                PublishError::InvalidConfig("no project specified".to_string()),
            ));
        }
        metadata
            .validate(self.options.strict_versioning)
            .map_err(|e| {
                PublishFailure::new(Stage::Validating, PublishError::InvalidConfig(e.to_string()))
            })?;

        // Identifier resolution.
        let project = resolve::resolve_project(self.host, &metadata.project)
            .await
            .map_err(|e| PublishFailure::new(Stage::ResolvingIdentifiers, e))?;
        output::debug(
            format!("project '{}' resolved to {}", metadata.project, project.id),
            self.verbosity,
        );
        let dependencies = resolve::resolve_dependencies(self.host, &metadata.dependencies)
            .await
            .map_err(|e| PublishFailure::new(Stage::ResolvingIdentifiers, e))?;

        // File resolution. Each reference is resolved and read exactly once;
        // the digest comes from the same bytes the upload attaches.
        let mut files: Vec<LoadedArtifact> = Vec::with_capacity(metadata.files.len());
        for reference in &metadata.files {
            let loaded = artifact::resolve(reference)
                .and_then(|resolved| resolved.load())
                .map_err(|e| PublishFailure::new(Stage::ResolvingFiles, e))?;
            output::debug(
                format!(
                    "attaching {} ({} bytes, sha512 {})",
                    loaded.name,
                    loaded.bytes.len(),
                    &loaded.sha512[..16]
                ),
                self.verbosity,
            );
            files.push(loaded);
        }

        // Build the wire request.
        let data = request::build_version_data(&metadata, &project.id, dependencies, &files);

        if self.options.debug_mode {
            output::print("debug mode: skipping upload", self.verbosity);
            return Ok(PublishOutcome::DryRun(data));
        }

        let local_digests: Vec<(String, String)> = files
            .iter()
            .map(|f| (f.name.clone(), f.sha512.clone()))
            .collect();
        let parts = request::build_upload_files(files);

        // Transport.
        let created = self
            .host
            .create_version(&data, parts)
            .await
            .map_err(|e| PublishFailure::new(Stage::Transporting, e))?;

        // Cross-check the service's digests against the local ones. A
        // mismatch is reported, not fatal: the upload already happened.
        for filename in digest_mismatches(&created.files, &local_digests) {
            output::warn(
                format!("sha512 mismatch for '{}' after upload", filename),
                self.verbosity,
            );
        }

        let primary_url = created.primary_file().map(|f| f.url.clone());
        output::success(
            format!(
                "published version {} to project {}",
                created.id, created.project_id
            ),
            self.verbosity,
        );

        Ok(PublishOutcome::Published(PublishReceipt {
            version_id: created.id,
            project_id: created.project_id,
            primary_url,
        }))
    }
}

/// Names of uploaded files whose echoed sha512 differs from the local one.
///
/// Files the service echoed without a sha512, or that were not attached
/// locally, are skipped; only a positive disagreement counts.
fn digest_mismatches(
    created: &[crate::host::CreatedFile],
    local: &[(String, String)],
) -> Vec<String> {
    created
        .iter()
        .filter_map(|file| {
            let remote = file.hashes.get("sha512")?;
            let (_, digest) = local.iter().find(|(name, _)| *name == file.filename)?;
            (remote != digest).then(|| file.filename.clone())
        })
        .collect()
}
