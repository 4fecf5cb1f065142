// Page arithmetic for the result grid. Pages are 1-indexed.
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Number of pages needed for `total` results; never less than one
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    let pages = total / page_size + usize::from(total % page_size != 0);
    pages.max(1)
}

/// The `[start, end)` slice of the result list shown on `page`
///
/// Always satisfies `start <= end <= total`, even for out-of-range pages.
pub fn visible_range(total: usize, page_size: usize, page: usize) -> Range<usize> {
    let start = page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(total);
    let end = start.saturating_add(page_size).min(total);
    start..end
}

/// Move `delta` pages from `page`, staying within `[1, total_pages]`
pub fn advance(page: usize, delta: isize, total_pages: usize) -> usize {
    let last = total_pages.max(1);
    let target = if delta.is_negative() {
        page.saturating_sub(delta.unsigned_abs())
    } else {
        page.saturating_add(delta as usize)
    };
    target.clamp(1, last)
}

/// "Showing 13–24 of 40 results"
pub fn page_summary(range: &Range<usize>, total: usize) -> String {
    if total == 0 || range.is_empty() {
        return format!("Showing 0 of {} results", total);
    }
    format!("Showing {}–{} of {} results", range.start + 1, range.end, total)
}

/// The page a viewer is on
///
/// Owned by whoever drives the view. Transitions return a new state rather
/// than mutating in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    page: usize,
}

impl PageState {
    pub fn first() -> Self {
        Self { page: 1 }
    }

    /// Jump straight to `page`, clamped to `[1, total_pages]`
    pub fn at(page: usize, total_pages: usize) -> Self {
        Self {
            page: page.clamp(1, total_pages.max(1)),
        }
    }

    pub fn page(self) -> usize {
        self.page
    }

    pub fn next(self, total_pages: usize) -> Self {
        Self {
            page: advance(self.page, 1, total_pages),
        }
    }

    pub fn prev(self, total_pages: usize) -> Self {
        Self {
            page: advance(self.page, -1, total_pages),
        }
    }

    /// Pull the page back into range after the result count or page size changed
    pub fn clamped(self, total_pages: usize) -> Self {
        Self::at(self.page, total_pages)
    }

    pub fn has_prev(self) -> bool {
        self.page > 1
    }

    pub fn has_next(self, total_pages: usize) -> bool {
        self.page < total_pages
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::first()
    }
}
