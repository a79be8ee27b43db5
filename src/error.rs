use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirTreeError {
    // Construction
    #[error("malformed path {path:?}: {reason}")]
    MalformedPath { path: String, reason: MalformedReason },

    #[error("invalid pattern")]
    InvalidPattern(String),

    // Enumeration
    #[error("path not found")]
    NotFound(PathBuf),

    #[error("network path unavailable")]
    NetworkUnavailable(PathBuf),

    #[error("IO error")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which structural check a [`DirTreeError::MalformedPath`] failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// Volume is not a single ASCII letter followed by `:`.
    Volume,
    /// Directory span holds characters illegal in a directory name.
    Directory,
    /// File span (stem and extension) holds illegal characters.
    File,
    /// The split components do not reassemble into the original text.
    Reassembly,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Volume     => "volume must be a drive letter followed by ':'",
            Self::Directory  => "directory contains illegal characters",
            Self::File       => "file name contains illegal characters",
            Self::Reassembly => "components do not reassemble into the original path",
        };
        f.write_str(msg)
    }
}

impl DirTreeError {
    pub(crate) fn malformed(path: impl Into<String>, reason: MalformedReason) -> Self {
        Self::MalformedPath { path: path.into(), reason }
    }

    /// The filesystem path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::NotFound(p)
            | Self::NetworkUnavailable(p)
            | Self::Io { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether a walk can continue after this error.
    ///
    /// Enumeration failures only remove one level from the walk. Malformed
    /// paths and patterns are caller mistakes and halt immediately.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::NetworkUnavailable(_) | Self::Io { .. }
        )
    }

    /// True when the failure was an unreachable network share rather than
    /// a missing path.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkUnavailable(_))
    }
}
