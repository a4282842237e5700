//! Read-only handle to a PDF template and its page geometry

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::io::ensure_file;
use crate::types::*;
use lopdf::{Document, Object, ObjectId};
use std::path::Path;

/// Page tree nesting beyond this is treated as malformed.
const MAX_PAGE_TREE_DEPTH: usize = 32;

/// A parsed template document.
///
/// The document is never modified; stamping clones it and edits the clone.
#[derive(Debug, Clone)]
pub struct DocumentTemplate {
    base_name: String,
    document: Document,
    pages: Vec<PageInfo>,
}

impl DocumentTemplate {
    /// Wrap an already-parsed document.
    pub fn from_document(document: Document, base_name: impl Into<String>) -> Result<Self> {
        let pages: Vec<PageInfo> = document
            .get_pages()
            .values()
            .map(|&id| {
                let (width, height, origin) = media_box(&document, id);
                PageInfo {
                    id,
                    width,
                    height,
                    origin,
                }
            })
            .collect();

        if pages.is_empty() {
            return Err(StampError::EmptyDocument);
        }

        Ok(Self {
            base_name: base_name.into(),
            document,
            pages,
        })
    }

    /// Parse a template from bytes.
    pub fn from_bytes(bytes: &[u8], base_name: impl Into<String>) -> Result<Self> {
        let document = Document::load_mem(bytes)?;
        Self::from_document(document, base_name)
    }

    /// Open and parse a template without blocking the async executor.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_owned();
        ensure_file(&path).await?;
        let bytes = tokio::fs::read(&path).await?;
        let base_name = base_name_of(&path);
        tokio::task::spawn_blocking(move || Self::from_bytes(&bytes, base_name)).await?
    }

    /// File stem used when naming outputs.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[PageInfo] {
        &self.pages
    }

    /// Geometry of the page at a zero-based index.
    pub fn page(&self, index: usize) -> Result<&PageInfo> {
        self.pages
            .get(index)
            .ok_or(StampError::PageIndexOutOfRange {
                index,
                page_count: self.pages.len(),
            })
    }
}

/// File stem of `path`, or `"document"` when it has none.
pub fn base_name_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

// =============================================================================
// Page Tree Helpers
// =============================================================================

/// Follow a single reference, if `obj` is one.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Look up a page attribute, walking up `/Parent` for inheritable keys.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return resolve(doc, value);
        }
        let parent = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Page (width, height, lower-left origin) in points.
///
/// Falls back to US Letter when no usable MediaBox exists.
pub(crate) fn media_box(doc: &Document, page_id: ObjectId) -> (f32, f32, (f32, f32)) {
    let fallback = (DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1, (0.0, 0.0));

    let Some(Object::Array(mb)) = inherited_attribute(doc, page_id, b"MediaBox") else {
        return fallback;
    };
    if mb.len() != 4 {
        return fallback;
    }

    let coords: Option<Vec<f32>> = mb
        .iter()
        .map(|o| resolve(doc, o).and_then(extract_number))
        .collect();
    match coords.as_deref() {
        Some(&[x0, y0, x1, y1]) => {
            let (left, right) = (x0.min(x1), x0.max(x1));
            let (bottom, top) = (y0.min(y1), y0.max(y1));
            if right - left <= 0.0 || top - bottom <= 0.0 {
                return fallback;
            }
            (right - left, top - bottom, (left, bottom))
        }
        _ => fallback,
    }
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
