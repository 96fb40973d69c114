//! PDF manipulation module

pub mod merge;
pub mod metadata;

// Re-export commonly used items
pub use merge::{merge, InputFile, MergeOutcome, PageReport, EMPTY_FILE_DESCRIPTION};
pub use metadata::{extract_metadata, page_count, PdfMetadata};
