/// Error types for the catalog browser
///
/// None of these are fatal: views turn them into renderable states,
/// and the image cache swallows `ImageError` into a soft failure.

use thiserror::Error;

/// Failures while fetching or validating an image
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("request for {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} did not return a recognizable image")]
    NotAnImage { url: String },
}

/// Failures surfaced by the catalog access layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    // The seeded in-memory catalog never produces this
    #[allow(dead_code)]
    #[error("catalog request failed: {0}")]
    Transport(String),
}

/// Failures reading or writing persisted preferences
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}
