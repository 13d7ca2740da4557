//! Load errors surfaced to the user

use thiserror::Error;

/// Reasons the loader produced no dataset
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("the uploaded file is empty")]
    Empty,

    #[error("could not read the upload with its header ({header}) or as fixed 10-column rows ({positional})")]
    Unreadable { header: String, positional: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
