use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced at the file boundary. Scoring never produces these.
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a JSON array of job objects: {source}", path.display())]
    MalformedJobs {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported resume format '{0}' (supported: pdf, docx, txt)")]
    UnsupportedFormat(String),

    #[error("could not extract text from resume: {0}")]
    Extraction(String),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SiftError>;
