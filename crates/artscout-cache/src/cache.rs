use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// Default time-to-live for cached API results: one hour
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// One slot per key. Holding the slot's lock is what makes a compute run once.
type Slot<V> = Arc<tokio::sync::Mutex<Option<CacheEntry<V>>>>;

/// In-memory memoization of async results with a fixed time-to-live
///
/// Each cached operation gets its own `ResultCache`, keyed by the operation's
/// argument. Concurrent callers asking for the same key wait on that key's
/// slot, so the upstream call happens at most once per key while a compute is
/// in flight. Different keys never block each other.
///
/// Failed computes are not cached.
pub struct ResultCache<K, V> {
    name: &'static str,
    ttl: Duration,
    slots: Mutex<HashMap<K, Slot<V>>>,
}

impl<K, V> ResultCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, or run `compute` and cache its result
    pub async fn get_or_try_compute<F, Fut, E>(&self, key: &K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(key);
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if cached.is_fresh(Instant::now()) {
                debug!(cache = self.name, ?key, "cache hit");
                return Ok(cached.value.clone());
            }
            debug!(cache = self.name, ?key, "cache entry expired");
        } else {
            debug!(cache = self.name, ?key, "cache miss");
        }

        match compute().await {
            Ok(value) => {
                *entry = Some(CacheEntry {
                    value: value.clone(),
                    expires_at: Instant::now() + self.ttl,
                });
                Ok(value)
            }
            Err(err) => {
                *entry = None;
                self.release_failed(key, &slot);
                Err(err)
            }
        }
    }

    /// Peek at a fresh value without computing anything
    pub async fn get(&self, key: &K) -> Option<V> {
        let slot = self.slots().get(key).cloned()?;
        let entry = slot.lock().await;
        entry
            .as_ref()
            .filter(|cached| cached.is_fresh(Instant::now()))
            .map(|cached| cached.value.clone())
    }

    pub fn invalidate(&self, key: &K) {
        self.slots().remove(key);
    }

    pub fn clear(&self) {
        self.slots().clear();
    }

    /// Drop slots that hold nothing fresh; returns how many went away.
    /// Slots with a compute in flight are left alone.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut slots = self.slots();
        let before = slots.len();

        slots.retain(|_, slot| match slot.try_lock() {
            Ok(entry) => entry.as_ref().is_some_and(|cached| cached.is_fresh(now)),
            Err(_) => true,
        });

        let purged = before - slots.len();
        if purged > 0 {
            debug!(cache = self.name, purged, "purged expired entries");
        }
        purged
    }

    /// Number of fresh entries. Slots busy computing are not counted.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.slots()
            .values()
            .filter(|slot| {
                slot.try_lock()
                    .map(|entry| entry.as_ref().is_some_and(|cached| cached.is_fresh(now)))
                    .unwrap_or(false)
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &K) -> Slot<V> {
        self.slots()
            .entry(key.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(None)))
            .clone()
    }

    // Forget the slot of a failed compute unless another caller is already
    // queued on it. Callers only clone a slot under the map lock, so the
    // count is stable while we hold it.
    fn release_failed(&self, key: &K, slot: &Slot<V>) {
        let mut slots = self.slots();
        let idle = slots
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && Arc::strong_count(slot) == 2);
        if idle {
            slots.remove(key);
        }
    }

    // The map lock is never held across an await, so a poisoned map is still consistent
    fn slots(&self) -> MutexGuard<'_, HashMap<K, Slot<V>>> {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_second_call_within_ttl_is_cached() {
        let cache: ResultCache<String, Vec<u64>> = ResultCache::new("search", DEFAULT_TTL);
        let calls = AtomicU32::new(0);
        let key = "Van Gogh".to_string();

        for _ in 0..2 {
            let ids = cache
                .get_or_try_compute(&key, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(vec![101, 102, 103])
                })
                .await
                .unwrap();
            assert_eq!(ids, vec![101, 102, 103]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_recomputed() {
        let cache: ResultCache<u64, u32> = ResultCache::new("object", Duration::from_secs(3600));
        let calls = AtomicU32::new(0);
        let compute = || async {
            Ok::<_, String>(calls.fetch_add(1, Ordering::SeqCst) + 1)
        };

        assert_eq!(cache.get_or_try_compute(&7, compute).await, Ok(1));

        tokio::time::advance(Duration::from_secs(3599)).await;
        assert_eq!(cache.get_or_try_compute(&7, compute).await, Ok(1));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get_or_try_compute(&7, compute).await, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_not_cached() {
        let cache: ResultCache<u64, String> = ResultCache::new("object", DEFAULT_TTL);

        let first = cache
            .get_or_try_compute(&1, || async { Err::<String, _>("upstream down") })
            .await;
        assert_eq!(first, Err("upstream down"));
        assert!(cache.get(&1).await.is_none());

        let second = cache
            .get_or_try_compute(&1, || async { Ok::<_, &str>("Irises".to_string()) })
            .await;
        assert_eq!(second, Ok("Irises".to_string()));
        assert_eq!(cache.get(&1).await, Some("Irises".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_compute() {
        let cache: ResultCache<&'static str, u32> = ResultCache::new("search", DEFAULT_TTL);
        let calls = AtomicU32::new(0);
        let compute = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, String>(42)
        };

        let (a, b, c) = tokio::join!(
            cache.get_or_try_compute(&"birds", compute),
            cache.get_or_try_compute(&"birds", compute),
            cache.get_or_try_compute(&"birds", compute),
        );

        assert_eq!((a, b, c), (Ok(42), Ok(42), Ok(42)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_keys_leave_no_slot_behind() {
        let cache: ResultCache<u64, String> = ResultCache::new("object", DEFAULT_TTL);

        for id in 1..=5 {
            let result = cache
                .get_or_try_compute(&id, || async { Err::<String, _>("timed out") })
                .await;
            assert!(result.is_err());
        }

        assert_eq!(cache.slots().len(), 0);
        assert_eq!(cache.purge_expired(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_and_len() {
        let cache: ResultCache<u64, u64> = ResultCache::new("object", Duration::from_secs(10));

        for id in 1..=3 {
            cache
                .get_or_try_compute(&id, || async move { Ok::<_, String>(id * 10) })
                .await
                .unwrap();
        }
        assert_eq!(cache.len(), 3);

        tokio::time::advance(Duration::from_secs(11)).await;
        cache
            .get_or_try_compute(&4, || async { Ok::<_, String>(40) })
            .await
            .unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.purge_expired(), 3);
        assert_eq!(cache.get(&4).await, Some(40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_forces_recompute() {
        let cache: ResultCache<u64, u32> = ResultCache::new("object", DEFAULT_TTL);
        let calls = AtomicU32::new(0);
        let compute = || async {
            Ok::<_, String>(calls.fetch_add(1, Ordering::SeqCst))
        };

        cache.get_or_try_compute(&5, compute).await.unwrap();
        cache.invalidate(&5);
        cache.get_or_try_compute(&5, compute).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
