//! host::mock
//!
//! Mock host implementation for deterministic testing.
//!
//! # Design
//!
//! The mock host stores projects and versions in memory and records every
//! operation, so tests can assert both on results and on which remote calls
//! were (or were not) made. Failure scenarios are injected with [`FailOn`].
//!
//! # Example
//!
//! ```
//! use modpub::host::mock::MockHost;
//! use modpub::host::ModHost;
//!
//! # tokio_test::block_on(async {
//! let host = MockHost::new();
//! host.insert_project("example-mod", "AABBCCDD");
//!
//! let project = host.get_project("example-mod").await.unwrap();
//! assert_eq!(project.id, "AABBCCDD");
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sha2::{Digest, Sha512};

use super::traits::{
    CreatedFile, CreatedVersion, HostError, ModHost, ProjectInfo, UploadFile, VersionData,
    VersionFilter, VersionInfo,
};

/// Mock host for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    inner: Arc<Mutex<MockHostInner>>,
}

#[derive(Debug, Default)]
struct MockHostInner {
    /// Seeded projects: (slug, id) pairs; lookups match either.
    projects: Vec<(String, String)>,
    /// Seeded versions, newest first (the service's natural order).
    versions: Vec<VersionInfo>,
    /// Bodies and file metadata from create_version calls.
    created: Vec<(VersionData, Vec<(String, String, usize)>)>,
    /// Responses synthesized for create_version calls, in call order.
    echoes: Vec<CreatedVersion>,
    /// Project bodies from update_project_body calls.
    body_updates: Vec<(String, String)>,
    /// Counter for synthesized version IDs.
    next_version: u32,
    /// Operation to fail, for error-path testing.
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail get_project with the given error.
    GetProject(HostError),
    /// Fail get_version with the given error.
    GetVersion(HostError),
    /// Fail list_versions with the given error.
    ListVersions(HostError),
    /// Fail create_version with the given error.
    CreateVersion(HostError),
    /// Fail update_project_body with the given error.
    UpdateProjectBody(HostError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    GetProject { reference: String },
    GetVersion { id: String },
    ListVersions { project_id: String, filter: VersionFilter },
    CreateVersion { project_id: String, part_keys: Vec<String> },
    UpdateProjectBody { project_id: String },
}

impl MockHost {
    /// Create an empty mock host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a project resolvable by slug or ID.
    pub fn insert_project(&self, slug: impl Into<String>, id: impl Into<String>) {
        let mut inner = self.inner.lock().unwrap();
        inner.projects.push((slug.into(), id.into()));
    }

    /// Seed a version, appended in list order (callers seed newest first).
    pub fn insert_version(&self, version: VersionInfo) {
        let mut inner = self.inner.lock().unwrap();
        inner.versions.push(version);
    }

    /// Configure one operation to fail.
    pub fn fail_on(&self, fail: FailOn) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = Some(fail);
    }

    /// All recorded operations, in call order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Bodies accepted by `create_version`, with per-file
    /// `(part_key, file_name, byte_len)` metadata in attachment order.
    pub fn created_versions(&self) -> Vec<(VersionData, Vec<(String, String, usize)>)> {
        self.inner.lock().unwrap().created.clone()
    }

    /// Project body updates accepted by `update_project_body`.
    pub fn body_updates(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().body_updates.clone()
    }

    /// Responses returned from `create_version`, with the echoed digests.
    pub fn create_version_echoes(&self) -> Vec<CreatedVersion> {
        self.inner.lock().unwrap().echoes.clone()
    }

    fn take_failure(inner: &mut MockHostInner, matches: impl Fn(&FailOn) -> Option<HostError>) -> Option<HostError> {
        if let Some(fail) = &inner.fail_on {
            if let Some(err) = matches(fail) {
                return Some(err);
            }
        }
        None
    }
}

#[async_trait]
impl ModHost for MockHost {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_project(&self, reference: &str) -> Result<ProjectInfo, HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::GetProject {
            reference: reference.to_string(),
        });
        if let Some(err) = Self::take_failure(&mut inner, |f| match f {
            FailOn::GetProject(e) => Some(e.clone()),
            _ => None,
        }) {
            return Err(err);
        }

        inner
            .projects
            .iter()
            .find(|(slug, id)| slug == reference || id == reference)
            .map(|(slug, id)| ProjectInfo {
                id: id.clone(),
                slug: Some(slug.clone()),
                title: None,
            })
            .ok_or_else(|| HostError::IdentifierNotFound(reference.to_string()))
    }

    async fn get_version(&self, id: &str) -> Result<VersionInfo, HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::GetVersion { id: id.to_string() });
        if let Some(err) = Self::take_failure(&mut inner, |f| match f {
            FailOn::GetVersion(e) => Some(e.clone()),
            _ => None,
        }) {
            return Err(err);
        }

        inner
            .versions
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| HostError::IdentifierNotFound(id.to_string()))
    }

    async fn list_versions(
        &self,
        project_id: &str,
        filter: &VersionFilter,
    ) -> Result<Vec<VersionInfo>, HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::ListVersions {
            project_id: project_id.to_string(),
            filter: filter.clone(),
        });
        if let Some(err) = Self::take_failure(&mut inner, |f| match f {
            FailOn::ListVersions(e) => Some(e.clone()),
            _ => None,
        }) {
            return Err(err);
        }

        let matches_filter = |v: &VersionInfo| {
            let loader_ok = filter.loaders.is_empty()
                || v.loaders.iter().any(|l| filter.loaders.contains(l));
            let game_ok = filter.game_versions.is_empty()
                || v.game_versions.iter().any(|g| filter.game_versions.contains(g));
            loader_ok && game_ok
        };

        Ok(inner
            .versions
            .iter()
            .filter(|v| v.project_id.as_deref() == Some(project_id) && matches_filter(v))
            .cloned()
            .collect())
    }

    async fn create_version(
        &self,
        data: &VersionData,
        files: Vec<UploadFile>,
    ) -> Result<CreatedVersion, HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::CreateVersion {
            project_id: data.project_id.clone(),
            part_keys: files.iter().map(|f| f.part_key.clone()).collect(),
        });
        if let Some(err) = Self::take_failure(&mut inner, |f| match f {
            FailOn::CreateVersion(e) => Some(e.clone()),
            _ => None,
        }) {
            return Err(err);
        }

        inner.next_version += 1;
        let id = format!("mockv{:03}", inner.next_version);

        // Echo the digest of the received bytes, like the real service.
        let created_files: Vec<CreatedFile> = files
            .iter()
            .map(|f| CreatedFile {
                hashes: HashMap::from([(
                    "sha512".to_string(),
                    hex::encode(Sha512::digest(&f.bytes)),
                )]),
                url: format!("https://cdn.mock.test/{}/{}", id, f.file_name),
                filename: f.file_name.clone(),
                primary: f.part_key == data.primary_file,
            })
            .collect();

        inner.created.push((
            data.clone(),
            files
                .iter()
                .map(|f| (f.part_key.clone(), f.file_name.clone(), f.bytes.len()))
                .collect(),
        ));

        let echo = CreatedVersion {
            id,
            project_id: data.project_id.clone(),
            name: Some(data.version_title.clone()),
            version_number: Some(data.version_number.clone()),
            changelog: Some(data.version_body.clone()),
            date_published: None,
            version_type: Some(data.release_channel.as_str().to_string()),
            files: created_files,
            game_versions: data.game_versions.clone(),
            loaders: data.loaders.clone(),
        };
        inner.echoes.push(echo.clone());
        Ok(echo)
    }

    async fn update_project_body(&self, project_id: &str, body: &str) -> Result<(), HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::UpdateProjectBody {
            project_id: project_id.to_string(),
        });
        if let Some(err) = Self::take_failure(&mut inner, |f| match f {
            FailOn::UpdateProjectBody(e) => Some(e.clone()),
            _ => None,
        }) {
            return Err(err);
        }

        inner
            .body_updates
            .push((project_id.to_string(), body.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ReleaseChannel;

    fn version(id: &str, project: &str, number: &str, loaders: &[&str]) -> VersionInfo {
        VersionInfo {
            id: id.to_string(),
            project_id: Some(project.to_string()),
            version_number: Some(number.to_string()),
            name: None,
            game_versions: vec!["1.20.1".to_string()],
            loaders: loaders.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn project_lookup_matches_slug_or_id() {
        let host = MockHost::new();
        host.insert_project("example-mod", "AABBCCDD");

        assert_eq!(host.get_project("example-mod").await.unwrap().id, "AABBCCDD");
        assert_eq!(host.get_project("AABBCCDD").await.unwrap().id, "AABBCCDD");
        assert!(matches!(
            host.get_project("missing").await,
            Err(HostError::IdentifierNotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_versions_applies_filter_hints() {
        let host = MockHost::new();
        host.insert_version(version("VVVV0002", "AABBCCDD", "1.1.0", &["fabric"]));
        host.insert_version(version("VVVV0001", "AABBCCDD", "1.0.0", &["forge"]));

        let filter = VersionFilter {
            loaders: vec!["fabric".to_string()],
            game_versions: vec![],
        };
        let listed = host.list_versions("AABBCCDD", &filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "VVVV0002");
    }

    #[tokio::test]
    async fn create_version_records_body_and_parts() {
        let host = MockHost::new();
        let data = VersionData {
            project_id: "AABBCCDD".into(),
            version_number: "1.2.0".into(),
            version_title: "1.2.0".into(),
            version_body: "changes".into(),
            release_channel: ReleaseChannel::Release,
            game_versions: vec!["1.20.1".into()],
            loaders: vec!["fabric".into()],
            dependencies: vec![],
            file_parts: vec!["0".into()],
            featured: false,
            primary_file: "0".into(),
        };
        let files = vec![UploadFile {
            part_key: "0".into(),
            file_name: "mod.jar".into(),
            bytes: vec![1, 2, 3],
        }];

        let created = host.create_version(&data, files).await.unwrap();
        assert_eq!(created.project_id, "AABBCCDD");
        assert!(created.primary_file().unwrap().primary);
        assert_eq!(
            created.files[0].hashes.get("sha512").unwrap(),
            &hex::encode(Sha512::digest([1u8, 2, 3]))
        );

        let recorded = host.created_versions();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].1, vec![("0".to_string(), "mod.jar".to_string(), 3)]);
    }

    #[tokio::test]
    async fn fail_on_injects_configured_error() {
        let host = MockHost::new();
        host.insert_project("example-mod", "AABBCCDD");
        host.fail_on(FailOn::GetProject(HostError::Transport(
            "connection refused".into(),
        )));

        assert!(matches!(
            host.get_project("example-mod").await,
            Err(HostError::Transport(_))
        ));
        // The failed attempt is still recorded.
        assert_eq!(host.operations().len(), 1);
    }
}
