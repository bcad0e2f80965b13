//! Interactive conversion requests.
//!
//! A [`ConversionRequest`] carries everything a single interactive run needs:
//! the PDF and which pages to read.  Front-ends build the page selection from
//! their own widgets; [`PageSelection::from_form`] handles the usual
//! "entire document" checkbox plus two page fields.

use std::path::PathBuf;

use crate::extract::PageWindow;

use super::PipelineError;

/// Which pages an interactive run reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelection {
    FullDocument,
    /// 1-based first and last page, both inclusive.
    Range { start_page: i64, end_page: i64 },
}

impl PageSelection {
    /// Build a selection from form input.
    ///
    /// When `full_document` is set the page fields are ignored entirely,
    /// whatever they contain.
    ///
    /// ```
    /// use pdf_audiobook::pipeline::PageSelection;
    ///
    /// assert_eq!(PageSelection::from_form(true, "x", "").unwrap(), PageSelection::FullDocument);
    /// assert_eq!(
    ///     PageSelection::from_form(false, " 2 ", "7").unwrap(),
    ///     PageSelection::Range { start_page: 2, end_page: 7 },
    /// );
    /// assert!(PageSelection::from_form(false, "two", "7").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidRange`] when a field is not a whole number.
    pub fn from_form(
        full_document: bool,
        start_field: &str,
        end_field: &str,
    ) -> Result<Self, PipelineError> {
        if full_document {
            return Ok(Self::FullDocument);
        }

        let parse = |field: &str, name: &str| {
            field
                .trim()
                .parse::<i64>()
                .map_err(|_| PipelineError::InvalidRange(format!("{name} page {field:?} is not a number")))
        };

        Ok(Self::Range {
            start_page: parse(start_field, "start")?,
            end_page: parse(end_field, "end")?,
        })
    }

    /// The window to extract; `None` means every page.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidRange`] when the first page is below 1 or the
    /// last page comes before the first.
    pub fn resolve(&self) -> Result<Option<PageWindow>, PipelineError> {
        match *self {
            Self::FullDocument => Ok(None),
            Self::Range {
                start_page,
                end_page,
            } => PageWindow::from_user_pages(start_page, end_page)
                .map(Some)
                .ok_or_else(|| {
                    PipelineError::InvalidRange(format!(
                        "pages {start_page} to {end_page} do not form a valid range"
                    ))
                }),
        }
    }
}

/// One interactive run: a PDF and a page selection.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub pdf_path: PathBuf,
    pub selection: PageSelection,
}

impl ConversionRequest {
    pub fn new(pdf_path: impl Into<PathBuf>, selection: PageSelection) -> Self {
        Self {
            pdf_path: pdf_path.into(),
            selection,
        }
    }

    pub fn full_document(pdf_path: impl Into<PathBuf>) -> Self {
        Self::new(pdf_path, PageSelection::FullDocument)
    }

    pub fn pages(pdf_path: impl Into<PathBuf>, start_page: i64, end_page: i64) -> Self {
        Self::new(
            pdf_path,
            PageSelection::Range {
                start_page,
                end_page,
            },
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
