//! PDF Fusion Library
//!
//! Combines selected pages of several PDF files into one document.
//! This library provides functionality to:
//! - Choose pages per file (first and last, one specific page, or all)
//! - Merge the chosen pages in input order into a single PDF
//! - Report what was taken from each file
//! - Hand the result to host actions such as open or print
//!
//! # Example
//!
//! ```no_run
//! use pdf_fusion::pdf::{merge, InputFile};
//! use pdf_fusion::selection::SelectionPolicy;
//!
//! let files = vec![
//!     InputFile::new("1. intro.pdf", std::fs::read("1. intro.pdf").unwrap()),
//!     InputFile::new("2. advanced.pdf", std::fs::read("2. advanced.pdf").unwrap()),
//! ];
//!
//! let outcome = merge(&files, &SelectionPolicy::new(true, Some(3)))
//!     .expect("Failed to merge PDFs");
//! std::fs::write("combined.pdf", &outcome.document).unwrap();
//! ```

pub mod error;
pub mod host;
pub mod inputs;
pub mod pdf;
pub mod report;
pub mod selection;

// Re-export commonly used items
pub use error::{Error, Result};
pub use selection::SelectionPolicy;
