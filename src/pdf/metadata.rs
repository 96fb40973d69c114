//! PDF metadata extraction

use lopdf::{Dictionary, Document, Object};
use serde::Serialize;
use crate::error::Result;

/// PDF metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfMetadata {
    /// Number of pages reachable through the page tree
    pub page_count: u32,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
}

/// Extract metadata from in-memory PDF bytes
pub fn extract_metadata(bytes: &[u8]) -> Result<PdfMetadata> {
    let doc = Document::load_mem(bytes)?;
    let page_count = doc.get_pages().len() as u32;

    let info = doc
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_object(id))
        .and_then(Object::as_dict)
        .ok();

    Ok(PdfMetadata {
        page_count,
        title: info.and_then(|dict| info_string(dict, b"Title")),
        author: info.and_then(|dict| info_string(dict, b"Author")),
    })
}

/// Count the pages of in-memory PDF bytes
pub fn page_count(bytes: &[u8]) -> Result<u32> {
    let doc = Document::load_mem(bytes)?;
    Ok(doc.get_pages().len() as u32)
}

fn info_string(info: &Dictionary, key: &[u8]) -> Option<String> {
    let bytes = info.get(key).and_then(Object::as_str).ok()?;
    String::from_utf8(bytes.to_vec()).ok()
}
