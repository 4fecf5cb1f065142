// Core logic for ArtScout
// Everything between typing a keyword and seeing a page of cards happens here
pub mod catalog;
pub mod config;
pub mod error;
pub mod explorer;
pub mod formatter;
pub mod models;
pub mod pager;
pub mod providers;

pub use catalog::{CachedCatalog, CatalogSource};
pub use config::Config;
pub use error::Error;
pub use explorer::{Explorer, PageFetch, PageView, SearchOutcome, SkippedItem};
pub use formatter::{caption, card, format_details, Card, DetailRow};
pub use models::{ObjectId, ObjectRecord, PageSize, Query, ResultSet};
pub use pager::PageState;
pub use providers::MetCatalog;

/// Saves spelling out the error type in every signature
pub type Result<T> = std::result::Result<T, Error>;
