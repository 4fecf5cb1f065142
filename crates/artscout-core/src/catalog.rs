use crate::{
    models::{ObjectId, ObjectRecord},
    Result,
};
use artscout_cache::ResultCache;
use std::time::Duration;
use tracing::debug;

/// Where search results and object records come from
///
/// The Met client implements this, and so does the caching wrapper around
/// it, which keeps tests free of HTTP.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Object IDs matching `query`, in relevance order
    async fn search_ids(&self, query: &str) -> Result<Vec<ObjectId>>;

    async fn get_object(&self, id: ObjectId) -> Result<ObjectRecord>;
}

/// Memoizes both catalog calls for a fixed time-to-live
///
/// Searches are keyed by query string, objects by ID, each in its own named
/// cache. Failures pass straight through and are not remembered. Every new
/// search sweeps out whatever has gone stale, so a long session does not
/// keep every keyword and object it ever touched.
pub struct CachedCatalog<C> {
    inner: C,
    searches: ResultCache<String, Vec<ObjectId>>,
    objects: ResultCache<ObjectId, ObjectRecord>,
}

impl<C: CatalogSource> CachedCatalog<C> {
    pub fn new(inner: C, ttl: Duration) -> Self {
        Self {
            inner,
            searches: ResultCache::new("search", ttl),
            objects: ResultCache::new("object", ttl),
        }
    }

    /// Drop entries whose TTL has passed
    pub fn purge_expired(&self) -> usize {
        let purged = self.searches.purge_expired() + self.objects.purge_expired();
        if purged > 0 {
            debug!(purged, "catalog cache purged");
        }
        purged
    }
}

#[async_trait::async_trait]
impl<C: CatalogSource> CatalogSource for CachedCatalog<C> {
    async fn search_ids(&self, query: &str) -> Result<Vec<ObjectId>> {
        self.purge_expired();
        self.searches
            .get_or_try_compute(&query.to_string(), || self.inner.search_ids(query))
            .await
    }

    async fn get_object(&self, id: ObjectId) -> Result<ObjectRecord> {
        self.objects
            .get_or_try_compute(&id, || self.inner.get_object(id))
            .await
    }
}
