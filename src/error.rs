use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the document store and its persistence layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied a document ID that is already in use. Continuing
    /// would corrupt the index invariants, so the operation is rejected
    /// before any structure is touched.
    #[error("document with ID {doc_id} already exists")]
    DuplicateId { doc_id: String },

    /// An ID-addressed operation referenced a document that is not stored.
    #[error("document with ID {doc_id} not found")]
    NotFound { doc_id: String },

    /// An underlying read or write failed; carries the offending path.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted snapshot could not be decoded.
    #[error("corrupt snapshot: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
