//! Error type for the review pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between picking a file and reading the
/// service response. The UI collapses all of these into one message.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Review service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
