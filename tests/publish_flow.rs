//! End-to-end publish pipeline tests against the mock host.
//!
//! These verify the orchestrator's stage ordering, defaulting policy, and
//! terminal failure behavior without touching the network.

use std::io::Write;
use std::path::PathBuf;

use modpub::core::artifact::ArtifactReference;
use modpub::core::metadata::{PublishMetadata, DEFAULT_CHANGELOG};
use modpub::core::types::{Dependency, DependencyKind, ReleaseChannel};
use modpub::host::mock::{FailOn, MockHost, MockOperation};
use modpub::host::HostError;
use modpub::probe::StaticEnvironment;
use modpub::publish::{PublishOptions, PublishOutcome, Publisher, Stage};
use modpub::ui::Verbosity;

use tempfile::TempDir;

fn jar_on_disk(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"jar bytes").unwrap();
    path
}

fn base_metadata(dir: &TempDir) -> PublishMetadata {
    PublishMetadata {
        project: "example-mod".to_string(),
        version_number: Some("1.2.0".to_string()),
        channel: ReleaseChannel::Release,
        game_versions: vec!["1.20.1".to_string()],
        loaders: vec!["fabric".to_string()],
        files: vec![ArtifactReference::path(jar_on_disk(dir, "mod.jar"))],
        ..PublishMetadata::default()
    }
}

fn publisher<'a>(
    host: &'a MockHost,
    env: &'a StaticEnvironment,
    options: PublishOptions,
) -> Publisher<'a> {
    Publisher::new(host, env, options, Verbosity::Quiet)
}

#[tokio::test]
async fn dependencies_are_resolved_into_the_wire_body() {
    let dir = TempDir::new().unwrap();
    let host = MockHost::new();
    host.insert_project("example-mod", "AABBCCDD");
    host.insert_project("fabric-api", "P7dR8mSH");
    let env = StaticEnvironment::empty();

    let mut metadata = base_metadata(&dir);
    metadata.dependencies = vec![Dependency::Project {
        project: "fabric-api".to_string(),
        kind: DependencyKind::Required,
    }];

    publisher(&host, &env, PublishOptions::default())
        .run(metadata)
        .await
        .unwrap();

    let created = host.created_versions();
    assert_eq!(created.len(), 1);
    let deps = &created[0].0.dependencies;
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].project_id.as_deref(), Some("P7dR8mSH"));
    assert_eq!(deps[0].dependency_type, DependencyKind::Required);
}

#[tokio::test]
async fn defaults_fill_changelog_and_title() {
    let dir = TempDir::new().unwrap();
    let host = MockHost::new();
    host.insert_project("example-mod", "AABBCCDD");
    let env = StaticEnvironment::empty();

    let mut metadata = base_metadata(&dir);
    metadata.version_name = None;
    metadata.changelog = None;

    publisher(&host, &env, PublishOptions::default())
        .run(metadata)
        .await
        .unwrap();

    let created = host.created_versions();
    assert_eq!(created[0].0.version_title, "1.2.0");
    assert_eq!(created[0].0.version_body, DEFAULT_CHANGELOG);
}

#[tokio::test]
async fn empty_loaders_without_probe_fail_before_any_network_call() {
    let dir = TempDir::new().unwrap();
    let host = MockHost::new();
    host.insert_project("example-mod", "AABBCCDD");
    let env = StaticEnvironment::empty();

    let mut metadata = base_metadata(&dir);
    metadata.loaders.clear();

    let failure = publisher(&host, &env, PublishOptions::default())
        .run(metadata)
        .await
        .unwrap_err();

    assert_eq!(failure.stage, Stage::Validating);
    assert!(host.operations().is_empty());
}

#[tokio::test]
async fn probe_fills_game_versions_then_pipeline_proceeds() {
    let dir = TempDir::new().unwrap();
    let host = MockHost::new();
    host.insert_project("example-mod", "AABBCCDD");
    let env = StaticEnvironment::new(
        vec!["fabric-loom".to_string()],
        [(
            "loom.minecraftVersion".to_string(),
            "1.20.4".to_string(),
        )]
        .into(),
        None,
    );

    let mut metadata = base_metadata(&dir);
    metadata.game_versions.clear();

    let outcome = publisher(&host, &env, PublishOptions::default())
        .run(metadata)
        .await
        .unwrap();

    assert!(matches!(outcome, PublishOutcome::Published(_)));
    assert_eq!(host.created_versions()[0].0.game_versions, vec!["1.20.4"]);
}

#[tokio::test]
async fn strict_versioning_rejects_non_semver_numbers() {
    let dir = TempDir::new().unwrap();
    let host = MockHost::new();
    host.insert_project("example-mod", "AABBCCDD");
    let env = StaticEnvironment::empty();

    let mut metadata = base_metadata(&dir);
    metadata.version_number = Some("build-42".to_string());

    let options = PublishOptions {
        strict_versioning: true,
        ..Default::default()
    };
    let failure = publisher(&host, &env, options)
        .run(metadata)
        .await
        .unwrap_err();
    assert_eq!(failure.stage, Stage::Validating);
}

#[tokio::test]
async fn dry_run_resolves_identifiers_but_never_uploads() {
    let dir = TempDir::new().unwrap();
    let host = MockHost::new();
    host.insert_project("example-mod", "AABBCCDD");
    let env = StaticEnvironment::empty();

    let options = PublishOptions {
        debug_mode: true,
        ..Default::default()
    };
    let outcome = publisher(&host, &env, options)
        .run(base_metadata(&dir))
        .await
        .unwrap();

    let data = match outcome {
        PublishOutcome::DryRun(data) => data,
        other => panic!("expected DryRun, got {:?}", other),
    };
    assert_eq!(data.project_id, "AABBCCDD");
    assert_eq!(data.primary_file, "0");
    assert!(host.created_versions().is_empty());
}

#[tokio::test]
async fn fail_silently_never_raises_and_never_retries() {
    let dir = TempDir::new().unwrap();
    let host = MockHost::new();
    host.insert_project("example-mod", "AABBCCDD");
    host.fail_on(FailOn::CreateVersion(HostError::Transport(
        "connection reset by peer".into(),
    )));
    let env = StaticEnvironment::empty();

    let options = PublishOptions {
        fail_silently: true,
        ..Default::default()
    };
    let outcome = publisher(&host, &env, options)
        .run(base_metadata(&dir))
        .await
        .unwrap();

    match outcome {
        PublishOutcome::Failed(failure) => assert_eq!(failure.stage, Stage::Transporting),
        other => panic!("expected Failed, got {:?}", other),
    }
    let attempts = host
        .operations()
        .iter()
        .filter(|op| matches!(op, MockOperation::CreateVersion { .. }))
        .count();
    assert_eq!(attempts, 1);
}

#[tokio::test]
async fn hard_failure_without_fail_silently() {
    let dir = TempDir::new().unwrap();
    let host = MockHost::new();
    host.insert_project("example-mod", "AABBCCDD");
    host.fail_on(FailOn::CreateVersion(HostError::ApiRejected {
        status: 422,
        error: "invalid_input".into(),
        description: "duplicate version".into(),
    }));
    let env = StaticEnvironment::empty();

    let failure = publisher(&host, &env, PublishOptions::default())
        .run(base_metadata(&dir))
        .await
        .unwrap_err();

    assert_eq!(failure.stage, Stage::Transporting);
    assert!(failure.to_string().contains("duplicate version"));
}

#[tokio::test]
async fn attachment_order_matches_declaration_order() {
    let dir = TempDir::new().unwrap();
    let host = MockHost::new();
    host.insert_project("example-mod", "AABBCCDD");
    let env = StaticEnvironment::empty();

    let mut metadata = base_metadata(&dir);
    metadata
        .files
        .push(ArtifactReference::path(jar_on_disk(&dir, "mod-sources.jar")));
    metadata
        .files
        .push(ArtifactReference::path(jar_on_disk(&dir, "mod-javadoc.jar")));

    publisher(&host, &env, PublishOptions::default())
        .run(metadata)
        .await
        .unwrap();

    let created = host.created_versions();
    let recorded: Vec<(&str, &str)> = created[0]
        .1
        .iter()
        .map(|(key, name, _)| (key.as_str(), name.as_str()))
        .collect();
    assert_eq!(
        recorded,
        vec![
            ("0", "mod.jar"),
            ("1", "mod-sources.jar"),
            ("2", "mod-javadoc.jar")
        ]
    );
    assert_eq!(created[0].0.file_parts, vec!["0", "1", "2"]);
    assert_eq!(created[0].0.primary_file, "0");
}
