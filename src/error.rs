//! Error types for the conversion pipeline.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Parse,
    Assets,
    Render,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read => "read",
            Stage::Parse => "parse",
            Stage::Assets => "assets",
            Stage::Render => "render",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Fatal errors returned by the conversion pipeline.
///
/// Every variant is fatal to the invocation; there is no partial success.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input file does not exist or cannot be opened.
    #[error("input file not found: '{}'", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Input could not be decoded or processed as text.
    #[error("cannot parse '{}': {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    /// An image referenced by the document is absent on disk.
    #[error("image '{reference}' not found at '{}'", .path.display())]
    MissingAsset { reference: String, path: PathBuf },

    /// The PDF rendering engine failed.
    #[error("failed to render '{}': {reason}", .path.display())]
    Render { path: PathBuf, reason: String },

    /// An output file or directory could not be written.
    #[error("cannot write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Returns the pipeline stage the error originated from.
    pub fn stage(&self) -> Stage {
        match self {
            ConvertError::InputNotFound { .. } => Stage::Read,
            ConvertError::Parse { .. } => Stage::Parse,
            ConvertError::MissingAsset { .. } => Stage::Assets,
            ConvertError::Render { .. } => Stage::Render,
            ConvertError::Write { .. } => Stage::Write,
        }
    }

    /// Builds a write error for `path`.
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Write {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
