//! Error types for the invx-core library.
//!
//! Field extraction itself never fails; these cover the layers around it.

use thiserror::Error;

/// Main error type for the invx library.
#[derive(Error, Debug)]
pub enum InvxError {
    /// Document loading error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to obtaining document text.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The file extension is not a supported document type.
    #[error("unsupported file type: {0:?}")]
    UnsupportedType(String),

    /// Raster images need the external OCR engine.
    #[error("{0} is an image; run it through an OCR engine and pass the resulting text")]
    RequiresOcr(String),

    /// The file exceeds the configured size limit.
    #[error("{path} is {size} bytes, over the {limit} byte limit")]
    TooLarge { path: String, size: u64, limit: u64 },

    /// Failed to read the PDF text layer.
    #[error("failed to extract PDF text: {0}")]
    Pdf(String),

    /// I/O error while reading the document.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to invoice field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The text is longer than the configured bound.
    #[error("input is {len} characters, over the {limit} character limit")]
    InputTooLarge { len: usize, limit: usize },
}

/// Result type for the invx library.
pub type Result<T> = std::result::Result<T, InvxError>;
