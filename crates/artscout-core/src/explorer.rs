// The view driver: search, pick the visible slice, fetch what's on screen
use crate::{
    catalog::CatalogSource,
    models::{ObjectId, ObjectRecord, PageSize, Query, ResultSet},
    pager::{self, PageState},
    Result,
};
use serde::Serialize;
use std::ops::Range;
use tracing::{info, warn};

/// How a search turned out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// No keyword yet, so nothing was searched
    Prompt,
    /// The catalog answered with zero IDs
    Empty,
    Results(ResultSet),
}

/// An object we could not fetch, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    pub id: ObjectId,
    pub reason: String,
}

/// Records fetched for a batch of IDs, plus the ones that failed
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageFetch {
    pub records: Vec<ObjectRecord>,
    pub skipped: Vec<SkippedItem>,
}

/// Everything needed to draw one page of results
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub state: PageState,
    pub page_size: PageSize,
    pub total: usize,
    pub total_pages: usize,
    pub range: Range<usize>,
    pub records: Vec<ObjectRecord>,
    pub skipped: Vec<SkippedItem>,
}

impl PageView {
    pub fn summary(&self) -> String {
        pager::page_summary(&self.range, self.total)
    }

    pub fn has_prev(&self) -> bool {
        self.state.has_prev()
    }

    pub fn has_next(&self) -> bool {
        self.state.has_next(self.total_pages)
    }
}

/// Drives one viewer session against a catalog
pub struct Explorer<C> {
    catalog: C,
}

impl<C: CatalogSource> Explorer<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Run a keyword search. A blank keyword never reaches the catalog.
    ///
    /// Upstream failures propagate to the caller.
    pub async fn search(&self, query: &Query) -> Result<SearchOutcome> {
        if query.is_blank() {
            return Ok(SearchOutcome::Prompt);
        }

        let keyword = query.keyword();

        let ids = self.catalog.search_ids(keyword).await?;
        info!("Search for {:?} returned {} objects", keyword, ids.len());

        if ids.is_empty() {
            Ok(SearchOutcome::Empty)
        } else {
            Ok(SearchOutcome::Results(ResultSet::new(keyword, ids)))
        }
    }

    /// Fetch records one at a time, in order
    ///
    /// A failed fetch skips that item; the rest of the batch still loads.
    pub async fn fetch_many(&self, ids: &[ObjectId]) -> PageFetch {
        let mut fetch = PageFetch::default();

        for &id in ids {
            match self.catalog.get_object(id).await {
                Ok(record) => fetch.records.push(record),
                Err(e) => {
                    warn!("Skipping object {}: {}", id, e);
                    fetch.skipped.push(SkippedItem {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        fetch
    }

    /// Load the page `state` points at, clamping it into range first
    pub async fn load_page(
        &self,
        results: &ResultSet,
        page_size: PageSize,
        state: PageState,
    ) -> PageView {
        let total = results.len();
        let total_pages = pager::total_pages(total, page_size.get());
        let state = state.clamped(total_pages);
        let range = pager::visible_range(total, page_size.get(), state.page());

        let fetch = self.fetch_many(results.slice(range.clone())).await;

        PageView {
            state,
            page_size,
            total,
            total_pages,
            range,
            records: fetch.records,
            skipped: fetch.skipped,
        }
    }
}
