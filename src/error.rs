//! Error types for the PDF fusion library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF fusion library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error while assembling the output
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// A non-empty input could not be decoded as a PDF
    #[error("Failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: lopdf::Error,
    },

    /// A selected page number does not address a page of its file
    #[error("Page {page} is outside 1..={page_count}")]
    PageOutOfRange { page: u32, page_count: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Merge called without any input
    #[error("No input files provided")]
    NoInputs,

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// No files matched pattern
    #[error("No PDF files found matching pattern: {0}")]
    NoFilesMatched(String),

    /// JSON summary serialization
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Host print or open action failed
    #[error("{action} failed: {message}")]
    HostAction {
        action: &'static str,
        message: String,
    },
}
