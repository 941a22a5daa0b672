//! core::config
//!
//! Manifest schema and loading.
//!
//! # Overview
//!
//! One `modpub.toml` manifest per project describes a publish: the target
//! project, the artifacts, the metadata, and a static picture of the build
//! environment. CLI flags override manifest values; the `MODRINTH_TOKEN`
//! environment variable backs a missing `token` field.
//!
//! # Example
//!
//! ```no_run
//! use modpub::core::config::Manifest;
//! use std::path::Path;
//!
//! let loaded = Manifest::load(Path::new("modpub.toml")).unwrap();
//! let metadata = loaded.manifest.to_metadata(loaded.base_dir());
//! println!("publishing {} file(s)", metadata.files.len());
//! ```

pub mod schema;

pub use schema::{DependencySpec, EnvironmentSection, Manifest};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::artifact::ArtifactReference;
use crate::core::metadata::PublishMetadata;
use crate::core::types::Dependency;
use crate::probe::StaticEnvironment;

/// Default manifest file name, looked up in the working directory.
pub const MANIFEST_FILE_NAME: &str = "modpub.toml";

/// Environment variable backing a missing `token` field.
pub const TOKEN_ENV_VAR: &str = "MODRINTH_TOKEN";

/// Errors from manifest operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read manifest '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid manifest value: {0}")]
    InvalidValue(String),
}

/// Result of loading a manifest.
#[derive(Debug)]
pub struct ManifestLoadResult {
    /// The parsed and validated manifest.
    pub manifest: Manifest,
    /// The path it was loaded from.
    pub path: PathBuf,
}

impl ManifestLoadResult {
    /// Directory artifact paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

impl Manifest {
    /// Load and validate a manifest from a path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load(path: &Path) -> Result<ManifestLoadResult, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let manifest: Manifest =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        manifest.validate()?;

        Ok(ManifestLoadResult {
            manifest,
            path: path.to_path_buf(),
        })
    }

    /// Resolve the API token.
    ///
    /// Precedence: explicit override (CLI flag), manifest `token` field,
    /// then the `MODRINTH_TOKEN` environment variable.
    pub fn resolve_token(&self, cli_override: Option<String>) -> Option<String> {
        cli_override
            .or_else(|| self.token.clone())
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
            .filter(|t| !t.is_empty())
    }

    /// Build the publish metadata record from manifest values.
    ///
    /// Artifact paths are resolved against `base_dir` (the manifest's
    /// directory), so a manifest works from any working directory.
    pub fn to_metadata(&self, base_dir: &Path) -> PublishMetadata {
        let mut files = Vec::new();
        if let Some(file) = &self.file {
            files.push(ArtifactReference::path(base_dir.join(file)));
        }
        for extra in self.additional_files.iter().flatten() {
            files.push(ArtifactReference::path(base_dir.join(extra)));
        }

        let dependencies = self
            .dependencies
            .iter()
            .flatten()
            .map(DependencySpec::to_dependency)
            .collect();

        PublishMetadata {
            project: self.project.clone().unwrap_or_default(),
            version_number: self.version_number.clone(),
            version_name: self.version_name.clone(),
            changelog: self.changelog.clone(),
            channel: self.channel(),
            game_versions: self.game_versions.clone().unwrap_or_default(),
            loaders: self.loaders.clone().unwrap_or_default(),
            dependencies,
            files,
            featured: self.featured.unwrap_or(false),
        }
    }

    /// Build the probe environment from the `[environment]` table.
    pub fn environment(&self) -> StaticEnvironment {
        match &self.environment {
            Some(env) => StaticEnvironment::new(
                env.plugins.clone().unwrap_or_default(),
                env.properties.clone().unwrap_or_default(),
                env.project_version.clone(),
            ),
            None => StaticEnvironment::empty(),
        }
    }
}

impl DependencySpec {
    /// Convert to the resolver's dependency representation.
    ///
    /// Validation guarantees at least one reference is present.
    fn to_dependency(&self) -> Dependency {
        match (&self.project, &self.version) {
            (project, Some(version)) => Dependency::Version {
                project: project.clone(),
                version: version.clone(),
                kind: self.kind(),
            },
            (Some(project), None) => Dependency::Project {
                project: project.clone(),
                kind: self.kind(),
            },
            (None, None) => Dependency::Project {
                project: String::new(),
                kind: self.kind(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DependencyKind, ReleaseChannel};
    use crate::probe::BuildEnvironment;
    use tempfile::TempDir;

    fn write_manifest(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join(MANIFEST_FILE_NAME);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn load_full_manifest() {
        let temp = TempDir::new().unwrap();
        let path = write_manifest(
            &temp,
            r#"
            project = "my-mod"
            version_number = "1.2.0"
            channel = "beta"
            game_versions = ["1.20.1"]
            loaders = ["fabric"]
            featured = true
            file = "build/libs/my-mod.jar"
            additional_files = ["build/libs/my-mod-sources.jar"]

            [[dependencies]]
            project = "fabric-api"

            [[dependencies]]
            version = "AABBCC11"
            kind = "optional"

            [environment]
            plugins = ["fabric-loom"]
            project_version = "1.2.0"
            "#,
        );

        let loaded = Manifest::load(&path).unwrap();
        let metadata = loaded.manifest.to_metadata(loaded.base_dir());

        assert_eq!(metadata.project, "my-mod");
        assert_eq!(metadata.version_number.as_deref(), Some("1.2.0"));
        assert_eq!(metadata.channel, ReleaseChannel::Beta);
        assert!(metadata.featured);
        assert_eq!(metadata.files.len(), 2);
        assert_eq!(metadata.dependencies.len(), 2);
        assert!(matches!(
            &metadata.dependencies[0],
            Dependency::Project { project, kind: DependencyKind::Required } if project == "fabric-api"
        ));
        assert!(matches!(
            &metadata.dependencies[1],
            Dependency::Version { project: None, version, kind: DependencyKind::Optional }
                if version == "AABBCC11"
        ));

        let env = loaded.manifest.environment();
        assert_eq!(env.project_version().as_deref(), Some("1.2.0"));
    }

    #[test]
    fn missing_manifest_is_a_read_error() {
        let temp = TempDir::new().unwrap();
        let result = Manifest::load(&temp.path().join(MANIFEST_FILE_NAME));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn malformed_manifest_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = write_manifest(&temp, "project = [not toml");
        let result = Manifest::load(&path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn invalid_channel_rejected_at_load() {
        let temp = TempDir::new().unwrap();
        let path = write_manifest(
            &temp,
            r#"
            project = "my-mod"
            channel = "nightly"
            "#,
        );
        let result = Manifest::load(&path);
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn artifact_paths_resolve_against_manifest_dir() {
        let temp = TempDir::new().unwrap();
        let path = write_manifest(
            &temp,
            r#"
            project = "my-mod"
            file = "build/libs/my-mod.jar"
            "#,
        );

        let loaded = Manifest::load(&path).unwrap();
        let metadata = loaded.manifest.to_metadata(loaded.base_dir());
        let rendered = format!("{}", metadata.files[0]);
        assert!(rendered.starts_with(temp.path().to_str().unwrap()));
    }

    #[test]
    fn token_precedence() {
        let manifest = Manifest {
            token: Some("from-manifest".to_string()),
            ..Default::default()
        };

        assert_eq!(
            manifest.resolve_token(Some("from-flag".to_string())),
            Some("from-flag".to_string())
        );
        assert_eq!(
            manifest.resolve_token(None),
            Some("from-manifest".to_string())
        );

        let empty = Manifest::default();
        // Resolution falls through to the environment variable; an unset or
        // empty variable yields None.
        std::env::remove_var(TOKEN_ENV_VAR);
        assert_eq!(empty.resolve_token(None), None);
    }
}
