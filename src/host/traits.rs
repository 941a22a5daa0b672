//! host::traits
//!
//! Host trait definition for the mod-hosting service API.
//!
//! # Design
//!
//! The `ModHost` trait is async because all host operations involve network
//! I/O. Every method returns `Result` with a typed [`HostError`]; no host
//! implementation ever swallows a failure — the publish orchestrator alone
//! decides whether a failure is surfaced or logged.
//!
//! The wire types here mirror the service's JSON shapes exactly
//! (`version_title`, `version_body`, `release_channel`, index-keyed
//! `file_parts`, and so on).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{DependencyKind, ReleaseChannel};

/// Errors from host operations.
///
/// Network-level failures (`Transport`) are deliberately distinct from
/// well-formed non-200 responses (`ApiRejected`) so callers can apply
/// different retry policy to each, and a body that fails to parse as the
/// expected shape (`ProtocolViolation`) is distinct from a declared API
/// error.
#[derive(Debug, Clone, Error)]
pub enum HostError {
    /// No authentication token is configured.
    #[error("authentication token required")]
    AuthRequired,

    /// A slug or version reference could not be resolved remotely.
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),

    /// The service declared an error in a well-formed non-200 response.
    #[error("API rejected request: {status} {error}: {description}")]
    ApiRejected {
        /// HTTP status code.
        status: u16,
        /// Error title from the service.
        error: String,
        /// Human-readable description from the service.
        description: String,
    },

    /// The response body did not have the expected shape.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// Network-level failure (connection refused, timeout, truncated body).
    #[error("transport error: {0}")]
    Transport(String),
}

/// Version-create request body, serialized as the `data` multipart part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionData {
    /// Canonical ID of the project the version belongs to.
    pub project_id: String,
    /// Version number.
    pub version_number: String,
    /// Display name of the version.
    pub version_title: String,
    /// Changelog text (Markdown).
    pub version_body: String,
    /// Release channel.
    pub release_channel: ReleaseChannel,
    /// Supported game versions.
    pub game_versions: Vec<String>,
    /// Supported loader tags.
    pub loaders: Vec<String>,
    /// Declared dependencies, fully resolved to canonical IDs.
    pub dependencies: Vec<WireDependency>,
    /// Positional part keys ("0", "1", ...) matching the attached files.
    pub file_parts: Vec<String>,
    /// Whether to feature the version on the project page.
    pub featured: bool,
    /// Part key of the primary file; always "0".
    pub primary_file: String,
}

/// Dependency as serialized on the wire.
///
/// A dependency referencing a project omits the version field and vice
/// versa; at least one is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDependency {
    /// Canonical project ID, if this is a project-level dependency (or the
    /// owning project of a version dependency, when known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Canonical version ID, if this is a version-level dependency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// Relationship kind.
    pub dependency_type: DependencyKind,
}

/// File contents attached as one binary multipart part.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Part key; the stringified positional index, matching `file_parts`.
    pub part_key: String,
    /// File name reported to the service.
    pub file_name: String,
    /// Raw contents.
    pub bytes: Vec<u8>,
}

/// Filter hints for listing a project's versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionFilter {
    /// Restrict to versions supporting any of these loaders.
    pub loaders: Vec<String>,
    /// Restrict to versions supporting any of these game versions.
    pub game_versions: Vec<String>,
}

impl VersionFilter {
    /// True when the filter constrains nothing.
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty() && self.game_versions.is_empty()
    }
}

/// Project lookup response. Only the fields the pipeline needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInfo {
    /// Canonical project ID.
    pub id: String,
    /// Project slug, when echoed by the service.
    #[serde(default)]
    pub slug: Option<String>,
    /// Project title, when echoed by the service.
    #[serde(default)]
    pub title: Option<String>,
}

/// Version lookup / list response entry.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    /// Canonical version ID.
    pub id: String,
    /// Owning project ID.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Human version number.
    #[serde(default)]
    pub version_number: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Supported game versions.
    #[serde(default)]
    pub game_versions: Vec<String>,
    /// Supported loader tags.
    #[serde(default)]
    pub loaders: Vec<String>,
}

/// One file of a created version, as echoed by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedFile {
    /// Digests keyed by algorithm name (e.g. "sha512").
    #[serde(default)]
    pub hashes: HashMap<String, String>,
    /// Direct download URL.
    pub url: String,
    /// File name.
    pub filename: String,
    /// Whether this is the primary file of the version.
    #[serde(default)]
    pub primary: bool,
}

/// Success payload for a created version.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedVersion {
    /// Canonical version ID.
    pub id: String,
    /// Owning project ID.
    pub project_id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Version number.
    #[serde(default)]
    pub version_number: Option<String>,
    /// Changelog.
    #[serde(default)]
    pub changelog: Option<String>,
    /// Publication timestamp.
    #[serde(default)]
    pub date_published: Option<DateTime<Utc>>,
    /// Release channel as reported by the service.
    #[serde(default)]
    pub version_type: Option<String>,
    /// Attached files.
    #[serde(default)]
    pub files: Vec<CreatedFile>,
    /// Supported game versions.
    #[serde(default)]
    pub game_versions: Vec<String>,
    /// Supported loader tags.
    #[serde(default)]
    pub loaders: Vec<String>,
}

impl CreatedVersion {
    /// The primary file, when the service marked one.
    pub fn primary_file(&self) -> Option<&CreatedFile> {
        self.files
            .iter()
            .find(|f| f.primary)
            .or_else(|| self.files.first())
    }
}

/// Structured error payload the service returns on non-200 responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Error title.
    #[serde(default)]
    pub error: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

/// The host trait for the mod-hosting service's versioning API.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` for use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, HostError>`. Lookup methods translate a
/// well-formed 404 into `IdentifierNotFound` so the resolver can apply its
/// fallback chain without inspecting status codes.
#[async_trait]
pub trait ModHost: Send + Sync {
    /// The host name (e.g. "modrinth").
    fn name(&self) -> &'static str;

    /// Look up a project by slug or canonical ID.
    ///
    /// # Errors
    ///
    /// - `IdentifierNotFound` if no project matches the reference
    /// - `ProtocolViolation` if the response lacks the expected shape
    async fn get_project(&self, reference: &str) -> Result<ProjectInfo, HostError>;

    /// Look up a version by canonical ID.
    ///
    /// # Errors
    ///
    /// - `IdentifierNotFound` if the ID does not name a version
    async fn get_version(&self, id: &str) -> Result<VersionInfo, HostError>;

    /// List a project's versions, newest first, optionally filtered by
    /// loader and game-version hints.
    async fn list_versions(
        &self,
        project_id: &str,
        filter: &VersionFilter,
    ) -> Result<Vec<VersionInfo>, HostError>;

    /// Create a new version: one multipart POST with the serialized
    /// [`VersionData`] as the `data` part and one binary part per file,
    /// keyed by the same positional indices as `data.file_parts`.
    async fn create_version(
        &self,
        data: &VersionData,
        files: Vec<UploadFile>,
    ) -> Result<CreatedVersion, HostError>;

    /// Replace the project's body/description text.
    async fn update_project_body(&self, project_id: &str, body: &str) -> Result<(), HostError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_error_display() {
        assert_eq!(
            format!("{}", HostError::IdentifierNotFound("my-mod".into())),
            "identifier not found: my-mod"
        );
        assert_eq!(
            format!(
                "{}",
                HostError::ApiRejected {
                    status: 422,
                    error: "invalid_input".into(),
                    description: "bad version number".into(),
                }
            ),
            "API rejected request: 422 invalid_input: bad version number"
        );
        assert_eq!(
            format!("{}", HostError::Transport("connection refused".into())),
            "transport error: connection refused"
        );
    }

    #[test]
    fn wire_dependency_omits_absent_side() {
        let project_dep = WireDependency {
            project_id: Some("AABBCCDD".into()),
            version_id: None,
            dependency_type: DependencyKind::Required,
        };
        let json = serde_json::to_value(&project_dep).unwrap();
        assert_eq!(json["project_id"], "AABBCCDD");
        assert!(json.get("version_id").is_none());
        assert_eq!(json["dependency_type"], "required");

        let version_dep = WireDependency {
            project_id: None,
            version_id: Some("IIJJKKLL".into()),
            dependency_type: DependencyKind::Optional,
        };
        let json = serde_json::to_value(&version_dep).unwrap();
        assert!(json.get("project_id").is_none());
        assert_eq!(json["version_id"], "IIJJKKLL");
    }

    #[test]
    fn version_data_wire_field_names() {
        let data = VersionData {
            project_id: "AABBCCDD".into(),
            version_number: "1.2.0".into(),
            version_title: "1.2.0".into(),
            version_body: "changes".into(),
            release_channel: ReleaseChannel::Beta,
            game_versions: vec!["1.20.1".into()],
            loaders: vec!["fabric".into()],
            dependencies: vec![],
            file_parts: vec!["0".into(), "1".into()],
            featured: false,
            primary_file: "0".into(),
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["version_title"], "1.2.0");
        assert_eq!(json["version_body"], "changes");
        assert_eq!(json["release_channel"], "beta");
        assert_eq!(json["file_parts"][1], "1");
        assert_eq!(json["primary_file"], "0");
        assert_eq!(json["featured"], false);
    }

    #[test]
    fn created_version_primary_file_prefers_marked_entry() {
        let version: CreatedVersion = serde_json::from_value(serde_json::json!({
            "id": "IIJJKKLL",
            "project_id": "AABBCCDD",
            "files": [
                {"url": "https://cdn.example/extra.zip", "filename": "extra.zip", "primary": false},
                {"url": "https://cdn.example/mod.jar", "filename": "mod.jar", "primary": true}
            ]
        }))
        .unwrap();
        assert_eq!(version.primary_file().unwrap().filename, "mod.jar");
    }

    #[test]
    fn error_body_tolerates_missing_fields() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.error, "");
        assert_eq!(body.description, "");
    }
}
