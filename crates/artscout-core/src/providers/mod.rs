// Catalog implementations backed by real APIs
pub mod met;

pub use met::MetCatalog;
