//! Crate-wide error type.

use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::FileKey;
use crate::syntax::ParseError;

/// Raised by the resolver when a type token names nothing reachable.
///
/// This is the only failure the resolver produces. Ambiguous cross-file
/// names that the importer's imports cannot settle end up here too.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unresolved type `{token}`")]
pub struct UnresolvedType {
    pub token: SmolStr,
}

impl UnresolvedType {
    pub fn new(token: impl Into<SmolStr>) -> Self {
        Self { token: token.into() }
    }
}

/// Errors that abort a compilation run.
#[derive(Debug, Error)]
pub enum PbtsError {
    #[error("{path}: {source}")]
    UnresolvedType {
        path: FileKey,
        #[source]
        source: UnresolvedType,
    },

    #[error("{path}:{source}")]
    Parse {
        path: FileKey,
        #[source]
        source: ParseError,
    },

    #[error("source not found: {path}")]
    SourceNotFound { path: FileKey },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to scan {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl PbtsError {
    /// The unresolved token, if this is a resolution failure.
    pub fn unresolved_token(&self) -> Option<&str> {
        match self {
            PbtsError::UnresolvedType { source, .. } => Some(&source.token),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PbtsError>;
