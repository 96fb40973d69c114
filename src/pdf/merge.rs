//! PDF merging functionality using lopdf

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;
use tracing::{debug, info, warn};
use crate::error::{Error, Result};
use crate::selection::{select_pages, PageSelection, SelectionPolicy};

/// Description recorded for a zero-byte input
pub const EMPTY_FILE_DESCRIPTION: &str = "file empty, skipped";

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against malformed page trees whose Parent links form a cycle
const MAX_TREE_DEPTH: usize = 64;

/// Annotation entries that may point at other annotations of the same page
const ANNOT_LINKS: [&[u8]; 3] = [b"Popup", b"Parent", b"IRT"];

/// One uploaded file: its display name and raw bytes
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, naming it by its file name
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self { name, bytes })
    }
}

/// Summary of what was taken from one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageReport {
    pub file_name: String,
    pub page_count: u32,
    pub included_pages: String,
}

/// Everything a merge run produces
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Serialized merged PDF
    pub document: Vec<u8>,
    /// One report per input, in input order
    pub reports: Vec<PageReport>,
    /// Names of zero-byte inputs, in input order
    pub empty_files: Vec<String>,
    pages_appended: usize,
}

impl MergeOutcome {
    /// Number of pages in `document`
    pub fn page_count(&self) -> usize {
        self.pages_appended
    }
}

/// Merge the selected pages of every input into one PDF
///
/// Files are processed in order. Zero-byte files are skipped and listed in
/// `empty_files`; a non-empty file that fails to decode aborts the whole run
/// with [`Error::Decode`].
///
/// # Example
///
/// ```no_run
/// use pdf_fusion::pdf::{merge, InputFile};
/// use pdf_fusion::selection::SelectionPolicy;
/// use std::path::Path;
///
/// let files = vec![
///     InputFile::from_path(Path::new("1. intro.pdf")).unwrap(),
///     InputFile::from_path(Path::new("2. advanced.pdf")).unwrap(),
/// ];
/// let outcome = merge(&files, &SelectionPolicy::new(true, None)).unwrap();
/// std::fs::write("combined.pdf", &outcome.document).unwrap();
/// ```
pub fn merge(files: &[InputFile], policy: &SelectionPolicy) -> Result<MergeOutcome> {
    if files.is_empty() {
        return Err(Error::NoInputs);
    }

    info!("Merging {} file(s) with {:?}", files.len(), policy);

    let mut merged = MergedDocument::new();
    let mut reports = Vec::with_capacity(files.len());
    let mut empty_files = Vec::new();

    for file in files {
        if file.bytes.is_empty() {
            warn!("Skipping empty file {}", file.name);
            reports.push(PageReport {
                file_name: file.name.clone(),
                page_count: 0,
                included_pages: EMPTY_FILE_DESCRIPTION.to_string(),
            });
            empty_files.push(file.name.clone());
            continue;
        }

        let source = Document::load_mem(&file.bytes).map_err(|source| Error::Decode {
            name: file.name.clone(),
            source,
        })?;

        let source_pages = merged.import(source);
        let page_count = source_pages.len() as u32;
        let selection = select_pages(page_count, policy);
        debug!("{}: {} page(s), selected {:?}", file.name, page_count, selection.pages);

        append_selection(&mut merged, &source_pages, &selection)?;

        let included_pages = selection.description();
        if selection.pages.len() < selection.tokens.len() {
            warn!("{}: {}", file.name, included_pages);
        }

        reports.push(PageReport {
            file_name: file.name.clone(),
            page_count,
            included_pages,
        });
    }

    let pages_appended = merged.page_count();
    let document = merged.finish()?;
    info!("Merged document has {} page(s)", pages_appended);

    Ok(MergeOutcome {
        document,
        reports,
        empty_files,
        pages_appended,
    })
}

fn append_selection(
    merged: &mut MergedDocument,
    source_pages: &[ObjectId],
    selection: &PageSelection,
) -> Result<()> {
    for &page_number in &selection.pages {
        let page_id = (page_number as usize)
            .checked_sub(1)
            .and_then(|index| source_pages.get(index))
            .copied()
            .ok_or_else(|| Error::PageOutOfRange {
                page: page_number,
                page_count: source_pages.len(),
            })?;
        merged.append_page(page_id)?;
    }
    Ok(())
}

/// Append-only output document
///
/// Source documents are imported whole (renumbered past the current max id);
/// each appended page becomes a fresh page object under a single Pages node.
/// The source page trees are dropped in [`MergedDocument::finish`] and
/// whatever is left unreferenced is pruned.
struct MergedDocument {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    /// Source pages and their Pages ancestors
    retired: BTreeSet<ObjectId>,
}

impl MergedDocument {
    fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            retired: BTreeSet::new(),
        }
    }

    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Move all objects of `source` into this document, returning the ids of
    /// its pages in page order
    fn import(&mut self, mut source: Document) -> Vec<ObjectId> {
        source.renumber_objects_with(self.doc.max_id + 1);
        self.doc.max_id = self.doc.max_id.max(source.max_id);

        let pages: Vec<ObjectId> = source.get_pages().into_values().collect();
        self.doc.objects.extend(source.objects);
        for &page_id in &pages {
            self.retire_branch(page_id);
        }
        pages
    }

    /// Mark a source page and its ancestors for removal
    fn retire_branch(&mut self, page_id: ObjectId) {
        let mut current = Some(page_id);
        for _ in 0..MAX_TREE_DEPTH {
            let Some(id) = current else { break };
            if !self.retired.insert(id) {
                break;
            }
            current = self
                .doc
                .get_object(id)
                .and_then(Object::as_dict)
                .and_then(|node| node.get(b"Parent"))
                .and_then(Object::as_reference)
                .ok();
        }
    }

    /// Append a copy of an imported page
    fn append_page(&mut self, source_page_id: ObjectId) -> Result<()> {
        let mut page = self.doc.get_object(source_page_id)?.as_dict()?.clone();
        let page_id = self.doc.new_object_id();

        for key in INHERITABLE_KEYS {
            if !page.has(key) {
                if let Some(value) = self.inherited_attribute(&page, key) {
                    page.set(key.to_vec(), value);
                }
            }
        }
        self.copy_annotations(&mut page, page_id);
        page.set("Parent", Object::Reference(self.pages_id));

        self.doc.objects.insert(page_id, Object::Dictionary(page));
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Give a copied page its own annotation objects pointing back at it
    ///
    /// Annotations are never shared between pages, and an annotation's /P
    /// must name the page that lists it.
    fn copy_annotations(&mut self, page: &mut Dictionary, page_id: ObjectId) {
        let annots = match page.get(b"Annots") {
            Ok(Object::Array(items)) => items.clone(),
            Ok(Object::Reference(id)) => match self.doc.get_object(*id) {
                Ok(Object::Array(items)) => items.clone(),
                _ => Vec::new(),
            },
            _ => return,
        };

        let mut renamed: BTreeMap<ObjectId, ObjectId> = BTreeMap::new();
        for item in &annots {
            if let Object::Reference(old_id) = item {
                renamed.entry(*old_id).or_insert_with(|| self.doc.new_object_id());
            }
        }

        let mut copied = Vec::with_capacity(annots.len());
        for item in annots {
            match item {
                Object::Reference(old_id) => {
                    let Ok(annot) = self.doc.get_object(old_id).and_then(Object::as_dict) else {
                        continue;
                    };
                    let annot = relink_annotation(annot.clone(), page_id, &renamed);
                    let new_id = renamed[&old_id];
                    self.doc.objects.insert(new_id, Object::Dictionary(annot));
                    copied.push(Object::Reference(new_id));
                }
                Object::Dictionary(annot) => {
                    copied.push(Object::Dictionary(relink_annotation(annot, page_id, &renamed)));
                }
                _ => {}
            }
        }

        page.set("Annots", Object::Array(copied));
    }

    /// Walk Parent links looking for an inherited attribute
    fn inherited_attribute(&self, page: &Dictionary, key: &[u8]) -> Option<Object> {
        let mut parent_id = page.get(b"Parent").and_then(Object::as_reference).ok()?;

        for _ in 0..MAX_TREE_DEPTH {
            let node = self.doc.get_object(parent_id).and_then(Object::as_dict).ok()?;
            if let Ok(value) = node.get(key) {
                return Some(value.clone());
            }
            parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        }

        None
    }

    /// Build the page tree and catalog, then serialize
    fn finish(mut self) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(self.page_ids.len() as i64)),
            ("Kids", Object::Array(kids)),
        ]);
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", Object::Reference(catalog_id));

        for id in &self.retired {
            self.doc.objects.remove(id);
        }
        self.doc.prune_objects();
        self.doc.compress();

        let mut buffer = Vec::new();
        self.doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

/// Point an annotation at its new page and at the copies of its siblings
fn relink_annotation(
    mut annot: Dictionary,
    page_id: ObjectId,
    renamed: &BTreeMap<ObjectId, ObjectId>,
) -> Dictionary {
    if annot.has(b"P") {
        annot.set("P", Object::Reference(page_id));
    }
    for key in ANNOT_LINKS {
        let target = annot.get(key).and_then(Object::as_reference).ok();
        if let Some(new_id) = target.and_then(|id| renamed.get(&id)) {
            annot.set(key.to_vec(), Object::Reference(*new_id));
        }
    }
    annot
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Stream, StringFormat};

    fn create_test_pdf(num_pages: u32) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let mut page_ids = Vec::new();

        for i in 0..num_pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
                    Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            format!("Page {}", i + 1).into_bytes(),
                            StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
            let page_id = doc.add_object(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                ("Contents", Object::Reference(content_id)),
            ]));
            page_ids.push(page_id);
        }

        // MediaBox lives on the Pages node so copies must inherit it
        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(num_pages as i64)),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_merge_no_inputs() {
        let result = merge(&[], &SelectionPolicy::default());
        assert!(matches!(result, Err(Error::NoInputs)));
    }

    #[test]
    fn test_merge_empty_file_is_reported() {
        let files = vec![
            InputFile::new("empty.pdf", Vec::new()),
            InputFile::new("three.pdf", create_test_pdf(3)),
        ];
        let outcome = merge(&files, &SelectionPolicy::default()).unwrap();

        assert_eq!(outcome.empty_files, vec!["empty.pdf".to_string()]);
        assert_eq!(outcome.reports[0].page_count, 0);
        assert_eq!(outcome.reports[0].included_pages, EMPTY_FILE_DESCRIPTION);
        assert_eq!(outcome.reports[1].included_pages, "1 to 3");
        assert_eq!(outcome.page_count(), 3);
    }

    #[test]
    fn test_merge_decode_failure_names_file() {
        let files = vec![
            InputFile::new("good.pdf", create_test_pdf(1)),
            InputFile::new("broken.pdf", b"not a pdf".to_vec()),
        ];
        match merge(&files, &SelectionPolicy::default()) {
            Err(Error::Decode { name, .. }) => assert_eq!(name, "broken.pdf"),
            other => panic!("expected decode error, got {:?}", other.map(|o| o.reports)),
        }
    }

    #[test]
    fn test_copied_pages_inherit_media_box() {
        let files = vec![InputFile::new("a.pdf", create_test_pdf(2))];
        let outcome = merge(&files, &SelectionPolicy::new(true, Some(2))).unwrap();

        let doc = Document::load_mem(&outcome.document).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 3);
        for page_id in pages.values() {
            let page = doc.get_object(*page_id).unwrap().as_dict().unwrap();
            assert!(page.has(b"MediaBox"));
        }
    }

    #[test]
    fn test_append_selection_rejects_unaddressable_page() {
        let mut merged = MergedDocument::new();
        let selection = PageSelection { pages: vec![0], tokens: Vec::new() };

        let result = append_selection(&mut merged, &[], &selection);
        assert!(matches!(result, Err(Error::PageOutOfRange { page: 0, page_count: 0 })));
        assert_eq!(merged.page_count(), 0);
    }

    #[test]
    fn test_input_file_from_missing_path() {
        let result = InputFile::from_path(Path::new("nonexistent.pdf"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }
}
