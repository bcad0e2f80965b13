//! Page windows — half-open ranges of zero-based page indices.
//!
//! A [`PageWindow`] is what one pipeline pass extracts, synthesises and plays.
//! Batch mode cuts a whole document into consecutive windows with
//! [`partition`]; interactive mode builds one from 1-based user input with
//! [`PageWindow::from_user_pages`].

use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// A half-open range `[start, end)` of zero-based page indices.
///
/// A window may extend past the end of a document; [`PageWindow::clamp`]
/// trims it to the pages that actually exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
}

impl PageWindow {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Build a window from 1-based page numbers as typed by a user.
    ///
    /// `start_page` is the first page to read (1-based, inclusive) and
    /// `end_page` the last (1-based, inclusive), i.e. the window is
    /// `[start_page - 1, end_page)`.  Returns `None` when the first page is
    /// below 1 or the range is empty.
    ///
    /// ```
    /// use pdf_audiobook::extract::PageWindow;
    ///
    /// assert_eq!(PageWindow::from_user_pages(3, 5), Some(PageWindow::new(2, 5)));
    /// assert_eq!(PageWindow::from_user_pages(1, 0), None);
    /// assert_eq!(PageWindow::from_user_pages(0, 4), None);
    /// ```
    pub fn from_user_pages(start_page: i64, end_page: i64) -> Option<Self> {
        let start = start_page.checked_sub(1)?;
        if start < 0 || end_page <= start {
            return None;
        }
        Some(Self::new(
            usize::try_from(start).ok()?,
            usize::try_from(end_page).ok()?,
        ))
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The page indices of this window that exist in a document of
    /// `page_count` pages.  Empty when the window lies past the last page.
    pub fn clamp(&self, page_count: usize) -> Range<usize> {
        let end = self.end.min(page_count);
        let start = self.start.min(end);
        start..end
    }

    /// First page of the window, 1-based.
    pub fn first_page(&self) -> usize {
        self.start + 1
    }

    /// Last page of the window, 1-based.
    pub fn last_page(&self) -> usize {
        self.end
    }

    /// Artifact file name for this window in batch mode,
    /// e.g. `audiobook_11_to_20.mp3`.
    pub fn artifact_name(&self) -> String {
        format!("audiobook_{}_to_{}.mp3", self.first_page(), self.last_page())
    }
}

impl fmt::Display for PageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pages {}-{}", self.first_page(), self.last_page())
    }
}

/// Split `[0, total_pages)` into consecutive windows of `pages_per_part`
/// pages.  The last window is shorter when `total_pages` is not a multiple
/// of `pages_per_part`.  Returns no windows when either argument is zero.
///
/// ```
/// use pdf_audiobook::extract::{partition, PageWindow};
///
/// let windows = partition(25, 10);
/// assert_eq!(windows, vec![
///     PageWindow::new(0, 10),
///     PageWindow::new(10, 20),
///     PageWindow::new(20, 25),
/// ]);
/// ```
pub fn partition(total_pages: usize, pages_per_part: usize) -> Vec<PageWindow> {
    if pages_per_part == 0 {
        return Vec::new();
    }
    (0..total_pages)
        .step_by(pages_per_part)
        .map(|start| PageWindow::new(start, (start + pages_per_part).min(total_pages)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
