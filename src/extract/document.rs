//! PDF document handles.
//!
//! [`PdfDocument`] is a read-only, opened document with a fixed page count.
//! [`DocumentLoader`] opens one from a path.  The production pair is
//! [`LopdfLoader`] / [`LopdfDocument`], built on `lopdf`.
//!
//! `FakeDocument` and `FakeLoader` (available under `#[cfg(test)]`) serve
//! scripted page text so the extractor and pipeline can be tested without PDF
//! files on disk.

use std::path::Path;
use std::sync::Arc;

use super::ExtractError;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// An opened PDF exposing its pages in document order.
///
/// Implementations must be `Send + Sync` so extraction can run on the
/// blocking thread pool.
pub trait PdfDocument: Send + Sync {
    /// Number of pages, fixed when the document was opened.
    fn page_count(&self) -> usize;

    /// Extractable text of the page at zero-based `index`.
    fn page_text(&self, index: usize) -> Result<String, ExtractError>;
}

/// Opens [`PdfDocument`]s from the filesystem.
pub trait DocumentLoader: Send + Sync {
    /// Open the PDF at `path`.
    ///
    /// # Errors
    ///
    /// [`ExtractError::Open`] when the file is missing or cannot be parsed.
    fn open(&self, path: &Path) -> Result<Arc<dyn PdfDocument>, ExtractError>;
}

// Compile-time assertion: both traits must be object-safe.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn PdfDocument>, _: Box<dyn DocumentLoader>) {}
};

// ---------------------------------------------------------------------------
// LopdfDocument
// ---------------------------------------------------------------------------

/// A PDF parsed by `lopdf`.
pub struct LopdfDocument {
    doc: lopdf::Document,
    /// lopdf's 1-based page numbers, in document order.
    page_numbers: Vec<u32>,
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("pages", &self.page_numbers.len())
            .finish_non_exhaustive()
    }
}

impl LopdfDocument {
    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::open(path, "file not found"));
        }

        let doc = lopdf::Document::load(path).map_err(|e| ExtractError::open(path, e))?;
        // get_pages() is a BTreeMap keyed by page number, so keys are ordered.
        let page_numbers = doc.get_pages().into_keys().collect();

        Ok(Self { doc, page_numbers })
    }
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String, ExtractError> {
        let number = *self
            .page_numbers
            .get(index)
            .ok_or_else(|| ExtractError::page(index, "page index out of range"))?;

        self.doc
            .extract_text(&[number])
            .map_err(|e| ExtractError::page(index, e))
    }
}

/// [`DocumentLoader`] backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfLoader;

impl DocumentLoader for LopdfLoader {
    fn open(&self, path: &Path) -> Result<Arc<dyn PdfDocument>, ExtractError> {
        let doc = LopdfDocument::load(path)?;
        log::debug!(
            "extract: opened {} ({} pages)",
            path.display(),
            doc.page_count()
        );
        Ok(Arc::new(doc))
    }
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// In-memory document.  A `None` page fails to extract.
#[cfg(test)]
pub struct FakeDocument {
    pages: Vec<Option<String>>,
    panics_on: Option<usize>,
}

#[cfg(test)]
impl FakeDocument {
    pub fn new(pages: Vec<Option<String>>) -> Self {
        Self {
            pages,
            panics_on: None,
        }
    }

    /// Make `page_text(index)` panic, like a parser hitting a malformed
    /// content stream.
    pub fn panicking_on(mut self, index: usize) -> Self {
        self.panics_on = Some(index);
        self
    }

    /// `count` pages whose text is `"[p1]"`, `"[p2]"`, … (1-based).
    pub fn numbered(count: usize) -> Self {
        Self::new((1..=count).map(|n| Some(format!("[p{n}]"))).collect())
    }
}

#[cfg(test)]
impl PdfDocument for FakeDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, ExtractError> {
        if self.panics_on == Some(index) {
            panic!("malformed content stream on page {}", index + 1);
        }
        match self.pages.get(index) {
            Some(Some(text)) => Ok(text.clone()),
            Some(None) => Err(ExtractError::page(index, "unreadable content stream")),
            None => Err(ExtractError::page(index, "page index out of range")),
        }
    }
}

/// Loader that hands out one shared [`FakeDocument`] (or fails) and counts
/// how many times it was asked to open a file.
#[cfg(test)]
pub struct FakeLoader {
    doc: Option<Arc<FakeDocument>>,
    opens: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl FakeLoader {
    pub fn with(doc: FakeDocument) -> Self {
        Self {
            doc: Some(Arc::new(doc)),
            opens: Default::default(),
        }
    }

    /// A loader whose every `open` fails as if the file were corrupt.
    pub fn broken() -> Self {
        Self {
            doc: None,
            opens: Default::default(),
        }
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl DocumentLoader for FakeLoader {
    fn open(&self, path: &Path) -> Result<Arc<dyn PdfDocument>, ExtractError> {
        self.opens.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.doc {
            Some(doc) => Ok(Arc::clone(doc) as Arc<dyn PdfDocument>),
            None => Err(ExtractError::open(path, "not a PDF file")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
