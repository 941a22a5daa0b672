//! probe
//!
//! Best-effort detection of game versions and loader tags from the build
//! environment.
//!
//! # Design
//!
//! The build environment is an external collaborator. Instead of dynamic
//! discovery, it implements the [`BuildEnvironment`] capability-query trait;
//! every query is infallible (`bool` / `Option`), so probing never raises —
//! a missing plugin or absent property simply contributes nothing.
//!
//! Detection runs only when the caller's explicit set is empty (enforced by
//! the orchestrator), and results from all probe layers are unioned; the
//! downstream duplicate suppression makes layer ordering immaterial.

use std::collections::HashMap;

/// Property key under which a Forge-style toolchain exposes the game version.
const FORGE_GAME_VERSION_PROPERTY: &str = "MC_VERSION";

/// Property key under which a Loom-style toolchain exposes the game version.
const LOOM_GAME_VERSION_PROPERTY: &str = "loom.minecraftVersion";

/// Toolchain plugins that imply a loader tag.
const LOADER_PLUGINS: &[(&str, &str)] = &[
    ("net.minecraftforge.gradle", "forge"),
    ("fabric-loom", "fabric"),
    ("org.quiltmc.loom", "quilt"),
];

/// Capability queries the build environment answers.
///
/// Implementations must never fail: anything the environment cannot answer
/// is `false` / `None`.
pub trait BuildEnvironment: Send + Sync {
    /// Whether a toolchain plugin with this identifier is active.
    fn has_plugin(&self, id: &str) -> bool;

    /// A named property of the build environment, if set.
    fn property(&self, key: &str) -> Option<String>;

    /// The building project's own version, if declared.
    fn project_version(&self) -> Option<String>;
}

/// Detect candidate game versions from the environment.
///
/// Runs every probe layer and unions non-empty results in layer order.
pub fn detect_game_versions(env: &dyn BuildEnvironment) -> Vec<String> {
    let mut detected = Vec::new();

    // Forge-style toolchains store the game version as a build property.
    if let Some(version) = env.property(FORGE_GAME_VERSION_PROPERTY) {
        if !version.is_empty() {
            detected.push(version);
        }
    }

    // Loom-style toolchains expose it only when the plugin is active.
    if env.has_plugin("fabric-loom") || env.has_plugin("org.quiltmc.loom") {
        if let Some(version) = env.property(LOOM_GAME_VERSION_PROPERTY) {
            if !version.is_empty() && !detected.contains(&version) {
                detected.push(version);
            }
        }
    }

    detected
}

/// Detect candidate loader tags from active toolchain plugins.
pub fn detect_loaders(env: &dyn BuildEnvironment) -> Vec<String> {
    LOADER_PLUGINS
        .iter()
        .filter(|(plugin, _)| env.has_plugin(plugin))
        .map(|(_, loader)| loader.to_string())
        .collect()
}

/// A build environment described by static data.
///
/// The CLI constructs one from the manifest's `[environment]` table; tests
/// construct them directly.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    plugins: Vec<String>,
    properties: HashMap<String, String>,
    version: Option<String>,
}

impl StaticEnvironment {
    /// An environment that answers nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Construct from plugin list, property map, and project version.
    pub fn new(
        plugins: Vec<String>,
        properties: HashMap<String, String>,
        version: Option<String>,
    ) -> Self {
        Self {
            plugins,
            properties,
            version,
        }
    }
}

impl BuildEnvironment for StaticEnvironment {
    fn has_plugin(&self, id: &str) -> bool {
        self.plugins.iter().any(|p| p == id)
    }

    fn property(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn project_version(&self) -> Option<String> {
        self.version.clone()
    }
}
