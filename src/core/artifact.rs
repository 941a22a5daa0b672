//! core::artifact
//!
//! Artifact reference resolution.
//!
//! # Design
//!
//! An artifact can be named three ways: a plain path, the declared output of
//! a build product, or a deferred handle that is not evaluated until publish
//! time. [`resolve`] dispatches exhaustively over the closed sum, so adding a
//! new reference kind is a compile-time-checked match arm.
//!
//! Existence is checked at resolution time, immediately before transport,
//! never at configuration time: a build product may not exist on disk until
//! a prior build step has run.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha512};
use thiserror::Error;

/// Maximum number of deferred unwraps before resolution gives up.
///
/// A deferred handle never yields another deferred handle in practice; the
/// guard exists so a misbehaving producer fails loudly instead of recursing.
const MAX_DEFERRED_DEPTH: u8 = 2;

/// Errors from artifact resolution and loading.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The resolved path does not exist on disk at resolution time.
    #[error("upload file is missing: {path}")]
    MissingFile {
        /// The path that was resolved but not found.
        path: PathBuf,
    },

    /// A deferred handle kept yielding deferred handles.
    #[error("artifact reference did not resolve within {depth} deferred evaluations")]
    Unresolvable {
        /// The depth limit that was exceeded.
        depth: u8,
    },

    /// Reading the file failed after it was resolved.
    #[error("failed to read artifact '{path}': {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// The declared output of a build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildProduct {
    /// Name of the producing build task, for diagnostics.
    pub task: String,
    /// Declared output path of the task.
    pub output: PathBuf,
}

/// A heterogeneous reference to an artifact on disk.
///
/// Resolved once per publish via [`resolve`]; resolution is pure and never
/// mutates the reference.
#[derive(Clone)]
pub enum ArtifactReference {
    /// A direct file path.
    Path(PathBuf),
    /// The output of a build step.
    BuildProduct(BuildProduct),
    /// A lazily evaluated handle, forced exactly once at resolution time.
    Deferred(Arc<dyn Fn() -> ArtifactReference + Send + Sync>),
}

impl ArtifactReference {
    /// Convenience constructor for a direct path reference.
    pub fn path(p: impl Into<PathBuf>) -> Self {
        ArtifactReference::Path(p.into())
    }

    /// Convenience constructor for a deferred reference.
    pub fn deferred(f: impl Fn() -> ArtifactReference + Send + Sync + 'static) -> Self {
        ArtifactReference::Deferred(Arc::new(f))
    }
}

impl fmt::Debug for ArtifactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactReference::Path(p) => f.debug_tuple("Path").field(p).finish(),
            ArtifactReference::BuildProduct(bp) => {
                f.debug_tuple("BuildProduct").field(bp).finish()
            }
            ArtifactReference::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl fmt::Display for ArtifactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactReference::Path(p) => write!(f, "{}", p.display()),
            ArtifactReference::BuildProduct(bp) => {
                write!(f, "{} (output of {})", bp.output.display(), bp.task)
            }
            ArtifactReference::Deferred(_) => write!(f, "<deferred>"),
        }
    }
}

/// A reference resolved to a concrete file that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// The concrete path.
    pub path: PathBuf,
}

impl ResolvedFile {
    /// The file name component, used as the multipart part file name.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Read the file into memory and digest it in the same pass.
    ///
    /// The returned bytes are the ones the transport attaches; no file is
    /// read twice.
    pub fn load(&self) -> Result<LoadedArtifact, ArtifactError> {
        let bytes = fs::read(&self.path).map_err(|source| ArtifactError::Io {
            path: self.path.clone(),
            source,
        })?;
        let sha512 = hex::encode(Sha512::digest(&bytes));
        Ok(LoadedArtifact {
            name: self.file_name(),
            bytes,
            sha512,
        })
    }
}

/// File contents ready for attachment, with a local digest.
#[derive(Debug, Clone)]
pub struct LoadedArtifact {
    /// File name attached to the multipart part.
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// Hex-encoded sha512 of `bytes`.
    pub sha512: String,
}

/// Resolve an artifact reference to a concrete file on disk.
///
/// Fails with [`ArtifactError::MissingFile`] when the resolved path does not
/// exist at call time, and [`ArtifactError::Unresolvable`] when a deferred
/// handle exceeds the depth guard.
pub fn resolve(reference: &ArtifactReference) -> Result<ResolvedFile, ArtifactError> {
    resolve_at_depth(reference, 0)
}

fn resolve_at_depth(reference: &ArtifactReference, depth: u8) -> Result<ResolvedFile, ArtifactError> {
    if depth > MAX_DEFERRED_DEPTH {
        return Err(ArtifactError::Unresolvable {
            depth: MAX_DEFERRED_DEPTH,
        });
    }

    match reference {
        ArtifactReference::Path(path) => existing(path),
        ArtifactReference::BuildProduct(product) => existing(&product.output),
        ArtifactReference::Deferred(force) => {
            let inner = force();
            resolve_at_depth(&inner, depth + 1)
        }
    }
}

fn existing(path: &Path) -> Result<ResolvedFile, ArtifactError> {
    if path.is_file() {
        Ok(ResolvedFile {
            path: path.to_path_buf(),
        })
    } else {
        Err(ArtifactError::MissingFile {
            path: path.to_path_buf(),
        })
    }
}
