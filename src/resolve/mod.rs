//! resolve
//!
//! Identifier resolution: project and version references, and the declared
//! dependency list, down to canonical IDs.
//!
//! # Ambiguity handling
//!
//! A reference written in a manifest is ambiguous between an opaque canonical
//! ID and a human-readable value (slug or version number). The resolver never
//! asks the caller to disambiguate:
//!
//! - Project references that already have the canonical ID shape are accepted
//!   as-is; anything else goes through a remote slug lookup.
//! - Version references are resolved in two phases, and the order matters:
//!   first as a canonical version ID, then — only on lookup failure — as a
//!   human version number matched exactly against the project's filtered
//!   version list, first match in the service's newest-first order. An input
//!   that happens to look like both resolves as an ID.
//!
//! There are no partial matches: an unresolved reference fails with
//! `HostError::IdentifierNotFound` naming the value.

use crate::core::types::{is_canonical_id, Dependency, Provenance, ResolvedIdentifier};
use crate::host::{HostError, ModHost, VersionFilter, WireDependency};

/// Resolve a project reference (slug or canonical ID) to its canonical ID.
///
/// A failed remote lookup surfaces as `IdentifierNotFound` with the raw
/// status and description folded into the message for diagnostics.
pub async fn resolve_project(
    host: &dyn ModHost,
    reference: &str,
) -> Result<ResolvedIdentifier, HostError> {
    if is_canonical_id(reference) {
        return Ok(ResolvedIdentifier::new(reference, Provenance::LiteralId));
    }

    match host.get_project(reference).await {
        Ok(project) => Ok(ResolvedIdentifier::new(project.id, Provenance::SlugLookup)),
        Err(HostError::ApiRejected {
            status,
            error,
            description,
        }) => Err(HostError::IdentifierNotFound(format!(
            "project '{}' (status {}: {} {})",
            reference, status, error, description
        ))),
        Err(other) => Err(other),
    }
}

/// Resolve a version reference (ID or version number) to its canonical ID.
///
/// `hints` carries the caller's loader/game-version sets, narrowing the
/// phase-two list scan the way the service expects.
pub async fn resolve_version(
    host: &dyn ModHost,
    project_id: &str,
    reference: &str,
    hints: &VersionFilter,
) -> Result<ResolvedIdentifier, HostError> {
    // Phase 1: treat the reference as a canonical version ID.
    match host.get_version(reference).await {
        Ok(version) => {
            return Ok(ResolvedIdentifier::new(
                version.id,
                Provenance::VersionIdLookup,
            ))
        }
        // Unknown ID or a service rejection of the reference shape: fall
        // through to the version-number scan. Transport and protocol
        // failures propagate; retrying them as a list scan would hide the
        // real problem.
        Err(HostError::IdentifierNotFound(_)) | Err(HostError::ApiRejected { .. }) => {}
        Err(other) => return Err(other),
    }

    // Phase 2: exact version-number match against the filtered list, first
    // match in the service's newest-first order.
    let versions = host.list_versions(project_id, hints).await?;
    versions
        .into_iter()
        .find(|v| v.version_number.as_deref() == Some(reference))
        .map(|v| ResolvedIdentifier::new(v.id, Provenance::VersionNumberMatch))
        .ok_or_else(|| {
            HostError::IdentifierNotFound(format!(
                "version '{}' of project '{}'",
                reference, project_id
            ))
        })
}

/// Resolve the declared dependency list to wire shape.
///
/// Project references are resolved like the main project reference. A
/// version dependency whose reference is not ID-shaped needs its owning
/// project for the list scan; without one it cannot be resolved.
pub async fn resolve_dependencies(
    host: &dyn ModHost,
    dependencies: &[Dependency],
) -> Result<Vec<WireDependency>, HostError> {
    let mut resolved = Vec::with_capacity(dependencies.len());

    for dependency in dependencies {
        match dependency {
            Dependency::Project { project, kind } => {
                let project = resolve_project(host, project).await?;
                resolved.push(WireDependency {
                    project_id: Some(project.id),
                    version_id: None,
                    dependency_type: *kind,
                });
            }
            Dependency::Version {
                project,
                version,
                kind,
            } => {
                let project_id = match project {
                    Some(reference) => Some(resolve_project(host, reference).await?.id),
                    None => None,
                };

                let version_id = match project_id.as_deref() {
                    // With a known owning project the full two-phase
                    // resolution applies: ID lookup first, then the list
                    // scan for an exact version-number match.
                    Some(owner) => {
                        resolve_version(host, owner, version, &VersionFilter::default())
                            .await?
                            .id
                    }
                    // Without one, only a canonical version ID can resolve,
                    // and it must be confirmed remotely; lookup failures
                    // propagate rather than shipping an unverified ID.
                    None if is_canonical_id(version) => host.get_version(version).await?.id,
                    None => {
                        return Err(HostError::IdentifierNotFound(format!(
                            "version dependency '{}' has no project to search",
                            version
                        )))
                    }
                };

                resolved.push(WireDependency {
                    project_id,
                    version_id: Some(version_id),
                    dependency_type: *kind,
                });
            }
        }
    }

    Ok(resolved)
}
