//! publish::request
//!
//! Assembles the wire-level upload request from validated inputs.
//!
//! # Part keys
//!
//! Attachments are keyed by their decimal index in declaration order ("0",
//! "1", ...), those keys are listed in `file_parts`, and `primary_file` is
//! always "0". The service treats the part named by `primary_file` as the
//! version's primary download.

use crate::core::artifact::LoadedArtifact;
use crate::core::metadata::PublishMetadata;
use crate::host::{UploadFile, VersionData, WireDependency};

/// Part key of the primary artifact.
const PRIMARY_PART_KEY: &str = "0";

/// Build the JSON body of the upload from validated metadata.
///
/// `project_id` and `dependencies` carry the resolved canonical identifiers;
/// `files` supplies one part key per attachment. Callers validate the
/// metadata first, so the defaulted fields are present.
pub fn build_version_data(
    metadata: &PublishMetadata,
    project_id: &str,
    dependencies: Vec<WireDependency>,
    files: &[LoadedArtifact],
) -> VersionData {
    let version_number = metadata.version_number.clone().unwrap_or_default();
    let version_title = metadata
        .version_name
        .clone()
        .unwrap_or_else(|| version_number.clone());
    let version_body = metadata.changelog.clone().unwrap_or_default();

    VersionData {
        project_id: project_id.to_string(),
        version_number,
        version_title,
        version_body,
        release_channel: metadata.channel,
        game_versions: metadata.game_versions.clone(),
        loaders: metadata.loaders.clone(),
        dependencies,
        file_parts: (0..files.len()).map(|i| i.to_string()).collect(),
        featured: metadata.featured,
        primary_file: PRIMARY_PART_KEY.to_string(),
    }
}

/// Map loaded artifacts to upload parts, assigning index keys in order.
pub fn build_upload_files(files: Vec<LoadedArtifact>) -> Vec<UploadFile> {
    files
        .into_iter()
        .enumerate()
        .map(|(index, file)| UploadFile {
            part_key: index.to_string(),
            file_name: file.name,
            bytes: file.bytes,
        })
        .collect()
}
