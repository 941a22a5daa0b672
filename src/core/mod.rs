//! core
//!
//! Domain types for the publish pipeline.
//!
//! # Modules
//!
//! - [`types`]: identifiers, release channels, dependencies
//! - [`artifact`]: artifact references and their resolution to bytes
//! - [`metadata`]: the publish metadata record and its lifecycle
//! - [`config`]: the `modpub.toml` manifest

pub mod artifact;
pub mod config;
pub mod metadata;
pub mod types;
