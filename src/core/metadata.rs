//! core::metadata
//!
//! The publish metadata record and its defaulting/validation lifecycle.
//!
//! # Lifecycle
//!
//! A [`PublishMetadata`] is populated by the caller, then defaulted (fills
//! only empty fields, never overwriting explicit values), then validated.
//! After validation it is consumed read-only by the rest of the pipeline;
//! nothing survives past one publish invocation.

use thiserror::Error;

use super::artifact::ArtifactReference;
use super::types::{is_semver_shaped, Dependency, ReleaseChannel};

/// Changelog used when the caller did not provide one.
pub const DEFAULT_CHANGELOG: &str = "No changelog was specified.";

/// Errors from metadata validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("no version number specified and none could be derived from the build environment")]
    MissingVersionNumber,

    #[error("no game versions specified")]
    NoGameVersions,

    #[error("no loaders specified")]
    NoLoaders,

    #[error("no upload file specified")]
    NoFiles,

    #[error("version number '{0}' is not semantic-version shaped")]
    VersionNotSemver(String),

    #[error("a version dependency must name a project or a version")]
    EmptyDependencyRef,
}

/// Metadata for one publish invocation.
///
/// Mutable until validated; the orchestrator treats it as read-only from the
/// validation gate onward.
#[derive(Debug, Clone, Default)]
pub struct PublishMetadata {
    /// Project slug or canonical ID.
    pub project: String,
    /// Version number; defaulted from the build environment's project
    /// version when unset.
    pub version_number: Option<String>,
    /// Display name; defaults to the version number.
    pub version_name: Option<String>,
    /// Changelog text (Markdown); defaults to [`DEFAULT_CHANGELOG`].
    pub changelog: Option<String>,
    /// Release channel.
    pub channel: ReleaseChannel,
    /// Supported game versions. Probed from the environment only when empty.
    pub game_versions: Vec<String>,
    /// Supported loader tags. Probed from the environment only when empty.
    pub loaders: Vec<String>,
    /// Declared dependencies.
    pub dependencies: Vec<Dependency>,
    /// Files to attach; the first entry is the primary artifact.
    pub files: Vec<ArtifactReference>,
    /// Whether the version should be featured on the project page.
    pub featured: bool,
}

impl PublishMetadata {
    /// Fill the version number if unset.
    pub fn default_version_number(&mut self, fallback: Option<String>) {
        if self.version_number.is_none() {
            self.version_number = fallback;
        }
    }

    /// Fill the display name from the version number if unset.
    pub fn default_version_name(&mut self) {
        if self.version_name.is_none() {
            self.version_name = self.version_number.clone();
        }
    }

    /// Fill the changelog if unset.
    pub fn default_changelog(&mut self) {
        if self.changelog.is_none() {
            self.changelog = Some(DEFAULT_CHANGELOG.to_string());
        }
    }

    /// Append detected game versions, suppressing duplicates.
    ///
    /// Callers only invoke this when the explicit set was empty, but dedup
    /// makes the merge safe regardless of probe ordering.
    pub fn merge_game_versions(&mut self, detected: Vec<String>) {
        for version in detected {
            if !self.game_versions.contains(&version) {
                self.game_versions.push(version);
            }
        }
    }

    /// Append detected loader tags, suppressing duplicates.
    pub fn merge_loaders(&mut self, detected: Vec<String>) {
        for loader in detected {
            if !self.loaders.contains(&loader) {
                self.loaders.push(loader);
            }
        }
    }

    /// Validate the record after defaulting.
    ///
    /// `strict_versioning` additionally requires a semantic-version-shaped
    /// version number.
    pub fn validate(&self, strict_versioning: bool) -> Result<(), MetadataError> {
        let version = self
            .version_number
            .as_deref()
            .ok_or(MetadataError::MissingVersionNumber)?;

        if strict_versioning && !is_semver_shaped(version) {
            return Err(MetadataError::VersionNotSemver(version.to_string()));
        }
        if self.game_versions.is_empty() {
            return Err(MetadataError::NoGameVersions);
        }
        if self.loaders.is_empty() {
            return Err(MetadataError::NoLoaders);
        }
        if self.files.is_empty() {
            return Err(MetadataError::NoFiles);
        }
        for dependency in &self.dependencies {
            if let Dependency::Version {
                project, version, ..
            } = dependency
            {
                if version.is_empty() && project.as_deref().map_or(true, str::is_empty) {
                    return Err(MetadataError::EmptyDependencyRef);
                }
            }
        }
        Ok(())
    }
}
