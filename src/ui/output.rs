//! ui::output
//!
//! Terminal output for the publish pipeline.
//!
//! # Conventions
//!
//! Results a script might consume (the primary-file URL, the dry-run body)
//! go to stdout; everything else goes to stderr. Per-stage progress — probe
//! results, resolved identifiers, attachment digests — uses [`debug`] with a
//! `[debug]` prefix and appears only under `--debug`. Downgraded failures
//! (the fail-silently path) use [`warn`], which stays visible unless
//! `--quiet` is set; [`error`] is reserved for terminal failures and is
//! never suppressed.

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Progress, warnings, and results.
    Normal,
    /// Everything, including per-stage diagnostics.
    Debug,
}

impl Verbosity {
    /// Create verbosity from the global `--quiet` / `--debug` flags.
    ///
    /// Quiet wins when both are set.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    fn shows_progress(self) -> bool {
        self != Verbosity::Quiet
    }

    fn shows_diagnostics(self) -> bool {
        self == Verbosity::Debug
    }
}

/// Print a result to stdout (suppressed by `--quiet`).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity.shows_progress() {
        println!("{}", message);
    }
}

/// Print a per-stage diagnostic (only under `--debug`).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity.shows_diagnostics() {
        eprintln!("[debug] {}", message);
    }
}

/// Print a terminal failure (never suppressed).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning, e.g. a downgraded failure or a digest mismatch
/// (suppressed by `--quiet`).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity.shows_progress() {
        eprintln!("warning: {}", message);
    }
}

/// Print a completion message for a finished operation (suppressed by
/// `--quiet`).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity.shows_progress() {
        println!("{}", message);
    }
}
