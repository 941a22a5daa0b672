//! core::config::schema
//!
//! Manifest schema types.
//!
//! # Manifest
//!
//! A publish is described by a `modpub.toml` manifest in the project
//! directory. Every field except `project` and `file` is optional; gaps are
//! filled by defaulting and environment probing before validation.
//!
//! # Validation
//!
//! Values are validated after parsing (channel must be a known release
//! channel, dependency entries must reference something, paths must be
//! non-empty).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ConfigError;
use crate::core::types::{DependencyKind, ReleaseChannel};

/// Publish manifest.
///
/// # Example
///
/// ```toml
/// project = "my-mod"
/// version_number = "1.2.0"
/// changelog = "Fixed the duplication glitch."
/// channel = "beta"
/// game_versions = ["1.20.1"]
/// loaders = ["fabric"]
/// file = "build/libs/my-mod-1.2.0.jar"
/// additional_files = ["build/libs/my-mod-1.2.0-sources.jar"]
///
/// [[dependencies]]
/// project = "fabric-api"
/// kind = "required"
///
/// [environment]
/// plugins = ["fabric-loom"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// API base URL override (defaults to the production API)
    pub api_url: Option<String>,

    /// API token (falls back to the `MODRINTH_TOKEN` environment variable)
    pub token: Option<String>,

    /// Target project slug or ID
    pub project: Option<String>,

    /// Version number (defaults from the build environment's project version)
    pub version_number: Option<String>,

    /// Human-readable version name (defaults to the version number)
    pub version_name: Option<String>,

    /// Changelog text
    pub changelog: Option<String>,

    /// Release channel: "release", "beta", or "alpha"
    pub channel: Option<String>,

    /// Compatible game versions
    pub game_versions: Option<Vec<String>>,

    /// Compatible loaders
    pub loaders: Option<Vec<String>>,

    /// Whether the version should be featured
    pub featured: Option<bool>,

    /// Treat upload failures as warnings instead of errors
    pub fail_silently: Option<bool>,

    /// Build the upload body but skip the network call
    pub debug_mode: Option<bool>,

    /// Probe the environment for loaders when none are declared
    pub detect_loaders: Option<bool>,

    /// Require the version number to be semver-shaped
    pub strict_versioning: Option<bool>,

    /// Markdown file whose contents replace the project body after upload
    pub sync_body_from: Option<String>,

    /// Primary artifact path
    pub file: Option<String>,

    /// Additional artifact paths, attached after the primary
    pub additional_files: Option<Vec<String>>,

    /// Declared dependencies
    pub dependencies: Option<Vec<DependencySpec>>,

    /// Build environment description, used for probing
    pub environment: Option<EnvironmentSection>,
}

impl Manifest {
    /// Validate the manifest values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(project) = &self.project {
            if project.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "project cannot be empty".to_string(),
                ));
            }
        }

        if let Some(channel) = &self.channel {
            ReleaseChannel::parse(channel).ok_or_else(|| {
                ConfigError::InvalidValue(format!(
                    "invalid channel '{}', must be one of: release, beta, alpha",
                    channel
                ))
            })?;
        }

        if let Some(file) = &self.file {
            if file.is_empty() {
                return Err(ConfigError::InvalidValue("file cannot be empty".to_string()));
            }
        }

        if let Some(additional) = &self.additional_files {
            if additional.iter().any(|f| f.is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "additional_files entries cannot be empty".to_string(),
                ));
            }
        }

        if let Some(deps) = &self.dependencies {
            for dep in deps {
                dep.validate()?;
            }
        }

        Ok(())
    }

    /// The release channel, parsed. Defaults to `Release`.
    pub fn channel(&self) -> ReleaseChannel {
        self.channel
            .as_deref()
            .and_then(ReleaseChannel::parse)
            .unwrap_or_default()
    }
}

/// One dependency entry.
///
/// References a project (by slug or ID), a specific version (by ID or
/// version number), or both. A version reference that is not ID-shaped
/// needs the owning project to be resolvable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DependencySpec {
    /// Project slug or ID
    pub project: Option<String>,

    /// Version ID or version number within the project
    pub version: Option<String>,

    /// Dependency kind (default: required)
    pub kind: Option<DependencyKind>,
}

impl DependencySpec {
    /// Validate the dependency entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.project, &self.version) {
            (None, None) => Err(ConfigError::InvalidValue(
                "dependency must name a project or a version".to_string(),
            )),
            (Some(p), _) if p.is_empty() => Err(ConfigError::InvalidValue(
                "dependency project cannot be empty".to_string(),
            )),
            (_, Some(v)) if v.is_empty() => Err(ConfigError::InvalidValue(
                "dependency version cannot be empty".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// The dependency kind, defaulting to required.
    pub fn kind(&self) -> DependencyKind {
        self.kind.unwrap_or(DependencyKind::Required)
    }
}

/// Static description of the build environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentSection {
    /// Active toolchain plugin identifiers
    pub plugins: Option<Vec<String>>,

    /// Build properties (e.g. `MC_VERSION`)
    pub properties: Option<HashMap<String, String>>,

    /// The building project's own version
    pub project_version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod manifest {
        use super::*;

        #[test]
        fn defaults() {
            let manifest = Manifest::default();
            assert!(manifest.project.is_none());
            assert!(manifest.file.is_none());
            assert_eq!(manifest.channel(), ReleaseChannel::Release);
        }

        #[test]
        fn valid_channel() {
            let manifest = Manifest {
                channel: Some("beta".to_string()),
                ..Default::default()
            };
            assert!(manifest.validate().is_ok());
            assert_eq!(manifest.channel(), ReleaseChannel::Beta);
        }

        #[test]
        fn invalid_channel() {
            let manifest = Manifest {
                channel: Some("nightly".to_string()),
                ..Default::default()
            };
            assert!(manifest.validate().is_err());
        }

        #[test]
        fn empty_project_rejected() {
            let manifest = Manifest {
                project: Some(String::new()),
                ..Default::default()
            };
            assert!(manifest.validate().is_err());
        }

        #[test]
        fn empty_file_rejected() {
            let manifest = Manifest {
                file: Some(String::new()),
                ..Default::default()
            };
            assert!(manifest.validate().is_err());
        }

        #[test]
        fn roundtrip() {
            let manifest = Manifest {
                project: Some("my-mod".to_string()),
                version_number: Some("1.2.0".to_string()),
                channel: Some("release".to_string()),
                game_versions: Some(vec!["1.20.1".to_string()]),
                loaders: Some(vec!["fabric".to_string()]),
                file: Some("build/libs/my-mod.jar".to_string()),
                dependencies: Some(vec![DependencySpec {
                    project: Some("fabric-api".to_string()),
                    version: None,
                    kind: Some(DependencyKind::Required),
                }]),
                environment: Some(EnvironmentSection {
                    plugins: Some(vec!["fabric-loom".to_string()]),
                    ..Default::default()
                }),
                ..Default::default()
            };

            let toml = toml::to_string_pretty(&manifest).unwrap();
            let parsed: Manifest = toml::from_str(&toml).unwrap();
            assert_eq!(manifest, parsed);
        }

        #[test]
        fn reject_unknown_fields() {
            let toml = r#"
                project = "my-mod"
                unknown_field = true
            "#;

            let result: Result<Manifest, _> = toml::from_str(toml);
            assert!(result.is_err());
        }
    }

    mod dependency_spec {
        use super::*;

        #[test]
        fn project_only() {
            let dep = DependencySpec {
                project: Some("fabric-api".to_string()),
                ..Default::default()
            };
            assert!(dep.validate().is_ok());
            assert_eq!(dep.kind(), DependencyKind::Required);
        }

        #[test]
        fn version_only() {
            let dep = DependencySpec {
                version: Some("AABBCC11".to_string()),
                kind: Some(DependencyKind::Optional),
                ..Default::default()
            };
            assert!(dep.validate().is_ok());
            assert_eq!(dep.kind(), DependencyKind::Optional);
        }

        #[test]
        fn neither_rejected() {
            assert!(DependencySpec::default().validate().is_err());
        }

        #[test]
        fn empty_reference_rejected() {
            let dep = DependencySpec {
                project: Some(String::new()),
                ..Default::default()
            };
            assert!(dep.validate().is_err());
        }
    }
}
