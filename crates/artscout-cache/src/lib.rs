// In-memory result cache
// Saves us from asking the museum the same question twice in an hour
// Keeps repeat renders from hitting the API again within the TTL

pub mod cache;

pub use cache::{ResultCache, DEFAULT_TTL};
