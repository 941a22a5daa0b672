//! modpub - Publish mod artifacts to Modrinth
//!
//! modpub is a single-binary tool that uploads build artifacts as new
//! versions of a Modrinth project: it fills unset metadata from the build
//! environment, resolves human-readable references to canonical IDs, and
//! sends one multipart upload per invocation.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the pipeline)
//! - [`publish`] - The staged publish orchestrator and request builder
//! - [`core`] - Domain types, metadata lifecycle, artifacts, and the manifest
//! - [`resolve`] - Identifier resolution to canonical IDs
//! - [`probe`] - Best-effort build-environment detection
//! - [`host`] - Abstraction over the hosting service API (Modrinth v2)
//! - [`ui`] - Terminal output utilities
//!
//! # Correctness Invariants
//!
//! modpub maintains the following invariants:
//!
//! 1. Defaulting fills gaps; explicit values are never overwritten
//! 2. Validation gates the pipeline before any remote call
//! 3. Each artifact is read from disk exactly once per publish
//! 4. No remote call is retried

pub mod cli;
pub mod core;
pub mod host;
pub mod probe;
pub mod publish;
pub mod resolve;
pub mod ui;
