//! host
//!
//! Abstraction over the mod-hosting service API.
//!
//! # Architecture
//!
//! The `ModHost` trait defines the remote surface the pipeline needs: project
//! and version lookups, the multipart version upload, and the project body
//! patch. The orchestrator and resolver depend only on the trait, so tests
//! run against [`mock::MockHost`] without network access.
//!
//! # Modules
//!
//! - `traits`: the `ModHost` trait, wire DTOs, and [`HostError`]
//! - [`modrinth`]: the reqwest implementation against the Modrinth v2 API
//! - [`mock`]: in-memory implementation for deterministic testing

pub mod mock;
pub mod modrinth;
mod traits;

pub use traits::*;
