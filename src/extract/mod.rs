//! Text extraction — PDF pages → one string per window.
//!
//! # Pipeline
//!
//! ```text
//! DocumentLoader::open(path) ──▶ Arc<dyn PdfDocument>
//!                                   │
//!                 PageWindow ───────┤ clamp to page_count
//!                                   ▼
//!                 page_text(i) for i in window, in order
//!                 (unreadable page → "" and a warning)
//!                                   ▼
//!                          concatenated String
//! ```
//!
//! Only opening the document can fail the whole call.  A single page that
//! cannot be read contributes an empty string, and pages past the end of the
//! document are skipped.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use pdf_audiobook::extract::{extract_text, DocumentLoader, LopdfLoader, PageWindow};
//!
//! let doc = LopdfLoader.open(Path::new("book.pdf")).unwrap();
//! let chapter = extract_text(doc.as_ref(), Some(PageWindow::new(0, 10)));
//! let everything = extract_text(doc.as_ref(), None);
//! assert!(chapter.len() <= everything.len());
//! ```

pub mod document;
pub mod window;

pub use document::{DocumentLoader, LopdfDocument, LopdfLoader, PdfDocument};
pub use window::{partition, PageWindow};

#[cfg(test)]
pub use document::{FakeDocument, FakeLoader};

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use thiserror::Error;

// ---------------------------------------------------------------------------
// ExtractError
// ---------------------------------------------------------------------------

/// Errors raised by the extraction layer.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// The document could not be opened (missing file, corrupt PDF).
    /// Fatal for the run that needed it.
    #[error("cannot open PDF {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    /// One page could not be read.  [`extract_text`] degrades this to an
    /// empty string; it never escapes a window.
    #[error("cannot read page {}: {reason}", index + 1)]
    Page { index: usize, reason: String },
}

impl ExtractError {
    pub fn open(path: &Path, reason: impl std::fmt::Display) -> Self {
        Self::Open {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn page(index: usize, reason: impl std::fmt::Display) -> Self {
        Self::Page {
            index,
            reason: reason.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// extract_text
// ---------------------------------------------------------------------------

/// Concatenate the text of the pages in `window`, in document order.
///
/// `None` extracts every page.  A window reaching past the last page is
/// clamped; one lying entirely past it yields an empty string.  Pages whose
/// text cannot be read, including pages the engine panics on, are logged and
/// contribute nothing.
pub fn extract_text(doc: &dyn PdfDocument, window: Option<PageWindow>) -> String {
    let page_count = doc.page_count();
    let pages = match window {
        Some(w) => w.clamp(page_count),
        None => 0..page_count,
    };

    let mut text = String::new();
    for index in pages {
        match panic::catch_unwind(AssertUnwindSafe(|| doc.page_text(index))) {
            Ok(Ok(page)) => text.push_str(&page),
            Ok(Err(e)) => log::warn!("extract: {e}; continuing with empty text"),
            Err(payload) => {
                let e = ExtractError::page(index, panic_message(payload.as_ref()));
                log::warn!("extract: {e}; continuing with empty text");
            }
        }
    }
    text
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "extraction engine panicked".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
