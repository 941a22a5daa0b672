//! core::types
//!
//! Domain types shared across the publishing pipeline.
//!
//! # Design
//!
//! References a user writes in a manifest are loosely typed: a project may be
//! named by slug or canonical ID, a version by number or ID. These types keep
//! that ambiguity explicit (`Dependency`, [`is_canonical_id`]) until the
//! resolver produces a [`ResolvedIdentifier`], which is immutable for the
//! remainder of the publish.

use serde::{Deserialize, Serialize};

/// Length of a canonical base62 identifier on the hosting service.
const CANONICAL_ID_LEN: usize = 8;

/// Check whether a reference already has the canonical ID shape.
///
/// Canonical IDs are 8-character base62 strings. A slug can in principle
/// also be 8 alphanumeric characters; the resolver deliberately treats such
/// inputs as IDs first (see `resolve` module docs).
///
/// # Example
///
/// ```
/// use modpub::core::types::is_canonical_id;
///
/// assert!(is_canonical_id("AABBCCDD"));
/// assert!(is_canonical_id("P7dR8mSH"));
/// assert!(!is_canonical_id("fabric-api"));
/// assert!(!is_canonical_id("short"));
/// ```
pub fn is_canonical_id(reference: &str) -> bool {
    reference.len() == CANONICAL_ID_LEN && reference.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Release channel of a published version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseChannel {
    /// Stable release
    #[default]
    Release,
    /// Beta release
    Beta,
    /// Alpha release
    Alpha,
}

impl ReleaseChannel {
    /// The wire name of the channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseChannel::Release => "release",
            ReleaseChannel::Beta => "beta",
            ReleaseChannel::Alpha => "alpha",
        }
    }

    /// Parse a channel from its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "release" => Some(ReleaseChannel::Release),
            "beta" => Some(ReleaseChannel::Beta),
            "alpha" => Some(ReleaseChannel::Alpha),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relationship between a published version and another project or version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// The version requires the dependency to work.
    Required,
    /// The version has additional functionality when the dependency is present.
    Optional,
    /// The version will not work when used together with the dependency.
    Incompatible,
    /// The dependency is bundled inside the published files.
    Embedded,
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DependencyKind::Required => "required",
            DependencyKind::Optional => "optional",
            DependencyKind::Incompatible => "incompatible",
            DependencyKind::Embedded => "embedded",
        };
        write!(f, "{}", name)
    }
}

/// A declared dependency of the version being published.
///
/// Closed sum over the two dependency shapes the service accepts. A version
/// dependency may additionally name its owning project, which lets the
/// resolver turn a human version number into an ID by scanning that
/// project's version list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    /// Depend on a project as a whole (any version).
    Project {
        /// Project slug or canonical ID.
        project: String,
        /// Relationship kind.
        kind: DependencyKind,
    },
    /// Depend on one specific version.
    Version {
        /// Project slug or canonical ID, if known. Required when `version`
        /// is a human version number rather than an ID.
        project: Option<String>,
        /// Version ID or human version number.
        version: String,
        /// Relationship kind.
        kind: DependencyKind,
    },
}

impl Dependency {
    /// The relationship kind, regardless of shape.
    pub fn kind(&self) -> DependencyKind {
        match self {
            Dependency::Project { kind, .. } | Dependency::Version { kind, .. } => *kind,
        }
    }
}

/// How a canonical ID was obtained.
///
/// Echoed back to the caller for diagnostics; a literal ID that was accepted
/// without a remote round trip is distinguishable from a slug lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// The reference already had the canonical ID shape.
    LiteralId,
    /// Resolved by a remote project (slug) lookup.
    SlugLookup,
    /// Resolved by a remote get-version-by-ID lookup.
    VersionIdLookup,
    /// Resolved by scanning the project's version list for an exact
    /// version-number match.
    VersionNumberMatch,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Provenance::LiteralId => "literal id",
            Provenance::SlugLookup => "slug lookup",
            Provenance::VersionIdLookup => "version id lookup",
            Provenance::VersionNumberMatch => "version number match",
        };
        write!(f, "{}", name)
    }
}

/// A canonical ID plus the path that produced it.
///
/// Immutable once constructed; the pipeline never re-resolves an identifier
/// mid-publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentifier {
    /// Canonical base62 ID.
    pub id: String,
    /// How the ID was obtained.
    pub provenance: Provenance,
}

impl ResolvedIdentifier {
    /// Construct a resolved identifier.
    pub fn new(id: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            id: id.into(),
            provenance,
        }
    }
}

/// Check whether a version number is semantic-version shaped.
///
/// Used only by the strict protocol variant's validation gate. The check is
/// intentionally a shape check, not a full semver parse: `MAJOR.MINOR.PATCH`
/// with numeric components, optionally followed by a `-prerelease` and/or
/// `+build` suffix.
pub fn is_semver_shaped(version: &str) -> bool {
    let core = version.split_once('+').map(|(c, _)| c).unwrap_or(version);
    let core = core.split_once('-').map(|(c, _)| c).unwrap_or(core);

    let parts: Vec<&str> = core.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}
