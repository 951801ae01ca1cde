use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::metrics::PAGE_CACHE_EVENTS;

/// In-process page cache keyed by request identity (path + query).
///
/// Entries expire after a fixed TTL and there is no invalidation path;
/// stale reads within the window are an accepted tradeoff. Used only for
/// the index feed.
pub struct PageCache {
    entries: DashMap<String, CachedPage>,
    ttl: Duration,
}

#[derive(Clone)]
struct CachedPage {
    body: String,
    stored_at: Instant,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Request identity: path plus query string when present.
    pub fn key(path: &str, query: &str) -> String {
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query)
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(entry) = self.entries.get(key) {
            if entry.stored_at.elapsed() < self.ttl {
                debug!("Page cache HIT for {}", key);
                PAGE_CACHE_EVENTS.with_label_values(&["hit"]).inc();
                return Some(entry.body.clone());
            }
        }

        // Expired entries are dropped on the read path.
        self.entries.remove(key);
        debug!("Page cache MISS for {}", key);
        PAGE_CACHE_EVENTS.with_label_values(&["miss"]).inc();
        None
    }

    pub fn put(&self, key: String, body: String) {
        self.entries.insert(
            key,
            CachedPage {
                body,
                stored_at: Instant::now(),
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_includes_query_only_when_present() {
        assert_eq!(PageCache::key("/", ""), "/");
        assert_eq!(PageCache::key("/", "page=2"), "/?page=2");
    }

    #[test]
    fn distinct_pages_cache_separately() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.put(PageCache::key("/", ""), "page-one".into());
        cache.put(PageCache::key("/", "page=2"), "page-two".into());

        assert_eq!(cache.get("/").as_deref(), Some("page-one"));
        assert_eq!(cache.get("/?page=2").as_deref(), Some("page-two"));
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = PageCache::new(Duration::ZERO);
        cache.put("/".into(), "stale".into());

        assert_eq!(cache.get("/"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn fresh_entries_are_served_within_ttl() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.put("/".into(), "fresh".into());

        assert_eq!(cache.get("/").as_deref(), Some("fresh"));
        assert_eq!(cache.get("/missing"), None);
    }
}
