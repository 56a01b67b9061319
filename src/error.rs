use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by building, saving, and loading a TF-IDF matrix.
///
/// Malformed rows and cells inside a matrix file are not errors; the loader
/// skips them and keeps going. Only conditions that make the whole call
/// meaningless end up here.
#[derive(Debug, Error)]
pub enum Error {
    /// A file could not be opened, read, created, or renamed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The matrix file has no header line.
    #[error("matrix file {path} is empty (missing header row)")]
    MissingHeader { path: PathBuf },

    /// Two matrix columns resolve to the same document id.
    #[error("document id {id:?} appears more than once in the matrix columns")]
    DuplicateDocument { id: String },

    /// Two vocabulary terms resolve to the same matrix row label.
    #[error("term {term:?} appears more than once in the matrix rows")]
    DuplicateTerm { term: String },

    /// The corpus root does not exist or is not a directory.
    #[error("corpus directory {path} not found")]
    CorpusNotFound { path: PathBuf },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
