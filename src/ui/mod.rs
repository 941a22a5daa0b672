//! ui
//!
//! Terminal output helpers shared by the CLI commands.

pub mod output;

pub use output::Verbosity;
