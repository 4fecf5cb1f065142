// Data types that every other module passes around
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The catalog's identifier for one object
pub type ObjectId = u64;

/// Results shown per page. Only a handful of sizes are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(usize);

impl PageSize {
    pub const OPTIONS: [usize; 5] = [9, 12, 15, 18, 24];

    pub fn get(self) -> usize {
        self.0
    }

    /// Next size in the list, wrapping back to the smallest
    pub fn next(self) -> Self {
        let index = Self::OPTIONS.iter().position(|&n| n == self.0).unwrap_or(0);
        PageSize(Self::OPTIONS[(index + 1) % Self::OPTIONS.len()])
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(15)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if Self::OPTIONS.contains(&value) {
            Ok(PageSize(value))
        } else {
            Err(format!(
                "page size must be one of {:?}, got {}",
                Self::OPTIONS,
                value
            ))
        }
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the user asked for
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub keyword: String,
    pub page_size: PageSize,
}

impl Query {
    pub fn new(keyword: impl Into<String>, page_size: PageSize) -> Self {
        Self {
            keyword: keyword.into(),
            page_size,
        }
    }

    /// The keyword as it gets sent, without surrounding whitespace
    pub fn keyword(&self) -> &str {
        self.keyword.trim()
    }

    /// A blank keyword means no search gets issued
    pub fn is_blank(&self) -> bool {
        self.keyword().is_empty()
    }
}

/// Object IDs for one keyword, in the order the catalog ranked them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub query: String,
    pub ids: Vec<ObjectId>,
}

impl ResultSet {
    pub fn new(query: impl Into<String>, ids: Vec<ObjectId>) -> Self {
        Self {
            query: query.into(),
            ids,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// IDs inside `range`, clamped to what we actually have
    pub fn slice(&self, range: Range<usize>) -> &[ObjectId] {
        let end = range.end.min(self.ids.len());
        let start = range.start.min(end);
        &self.ids[start..end]
    }
}

/// One catalog object, as much of it as we display
///
/// Every field but the id may be missing upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub object_id: ObjectId,
    pub primary_image: Option<String>,
    pub primary_image_small: Option<String>,
    pub title: Option<String>,
    pub artist_display_name: Option<String>,
    pub artist_display_bio: Option<String>,
    pub object_name: Option<String>,
    pub department: Option<String>,
    pub object_date: Option<String>,
    pub object_begin_date: Option<i64>,
    pub object_end_date: Option<i64>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub culture: Option<String>,
    pub period: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub accession_number: Option<String>,
    pub accession_year: Option<String>,
    pub credit_line: Option<String>,
    pub tags: Vec<String>,
    pub object_url: Option<String>,
}

impl ObjectRecord {
    /// Small rendition if there is one, otherwise the full image
    pub fn image_url(&self) -> Option<&str> {
        non_empty(&self.primary_image_small).or_else(|| non_empty(&self.primary_image))
    }

    pub fn display_title(&self) -> &str {
        non_empty(&self.title).unwrap_or("Untitled")
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
