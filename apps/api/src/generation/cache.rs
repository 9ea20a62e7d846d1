//! Result cache keyed by (profile, brief, platform).
//!
//! Bounded insertion-order cache: at capacity the oldest-inserted entry is
//! evicted, and re-inserting an existing key moves it to the back. Entries
//! expire after a fixed TTL, checked on read.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::models::brand::{BrandProfile, ContentBrief};
use crate::models::platform::Platform;
use crate::models::result::GenerationResult;

pub const MAX_ENTRIES: usize = 100;
pub const TTL: Duration = Duration::from_secs(30 * 60);

/// Key material is a fixed-order projection of the inputs, so two profiles
/// that differ only in field order or ignored fields produce the same key.
#[derive(Serialize)]
struct KeyProjection<'a> {
    company_name: &'a str,
    industry: &'a str,
    tone: &'a str,
    target_audience: &'a str,
    example_post_1: &'a str,
    example_post_2: &'a str,
    topic: &'a str,
    cta: Option<&'a str>,
    keywords: Option<&'a str>,
    platform: &'a str,
}

pub fn generate_key(profile: &BrandProfile, brief: &ContentBrief, platform: Platform) -> String {
    let projection = KeyProjection {
        company_name: &profile.company_name,
        industry: &profile.industry,
        tone: &profile.tone,
        target_audience: &profile.target_audience,
        example_post_1: &profile.example_post_1,
        example_post_2: &profile.example_post_2,
        topic: &brief.topic,
        cta: brief.cta.as_deref(),
        keywords: brief.keywords.as_deref(),
        platform: platform.as_str(),
    };
    // Serialization of a plain struct of strings cannot fail.
    serde_json::to_string(&projection).unwrap_or_default()
}

struct CacheEntry {
    value: GenerationResult,
    inserted_at: Instant,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    order: VecDeque<String>,
}

/// Snapshot of cache occupancy for the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub ttl_seconds: u64,
}

pub struct ResultCache {
    inner: Mutex<CacheInner>,
    max_size: usize,
    ttl: Duration,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(MAX_ENTRIES, TTL)
    }
}

impl ResultCache {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            max_size,
            ttl,
        }
    }

    /// Returns the cached result for `key`, evicting it first if expired.
    pub fn get(&self, key: &str) -> Option<GenerationResult> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        let expired = match inner.entries.get(key) {
            Some(entry) => entry.inserted_at.elapsed() >= self.ttl,
            None => return None,
        };
        if expired {
            inner.entries.remove(key);
            inner.order.retain(|k| k != key);
            return None;
        }
        inner.entries.get(key).map(|e| e.value.clone())
    }

    pub fn set(&self, key: String, value: GenerationResult) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        if inner.entries.contains_key(&key) {
            inner.order.retain(|k| k != &key);
        } else if inner.entries.len() >= self.max_size {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
            }
        }
        inner.order.push_back(key.clone());
        inner.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn remove(&self, key: &str) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.entries.remove(key);
        inner.order.retain(|k| k != key);
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.entries.clear();
        inner.order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().expect("cache lock poisoned");
        CacheStats {
            size: inner.entries.len(),
            max_size: self.max_size,
            ttl_seconds: self.ttl.as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_for(platform: Platform, content: &str) -> GenerationResult {
        GenerationResult::success(platform, content.to_string())
    }

    #[test]
    fn test_set_then_get() {
        let cache = ResultCache::default();
        cache.set("k1".to_string(), result_for(Platform::Twitter, "tweet"));
        let hit = cache.get("k1").unwrap();
        assert_eq!(hit.content.as_deref(), Some("tweet"));
        assert!(cache.get("k2").is_none());
        assert_eq!(cache.stats().size, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let cache = ResultCache::new(10, Duration::from_secs(60));
        cache.set("k1".to_string(), result_for(Platform::Linkedin, "post"));
        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get("k1").is_some());
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("k1").is_none());
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_capacity_evicts_oldest_insertion() {
        let cache = ResultCache::new(3, Duration::from_secs(600));
        cache.set("a".to_string(), result_for(Platform::Twitter, "1"));
        cache.set("b".to_string(), result_for(Platform::Twitter, "2"));
        cache.set("c".to_string(), result_for(Platform::Twitter, "3"));
        cache.set("d".to_string(), result_for(Platform::Twitter, "4"));
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("d").is_some());
        assert_eq!(cache.stats().size, 3);
    }

    #[test]
    fn test_reinsert_moves_key_to_back() {
        let cache = ResultCache::new(3, Duration::from_secs(600));
        cache.set("a".to_string(), result_for(Platform::Twitter, "1"));
        cache.set("b".to_string(), result_for(Platform::Twitter, "2"));
        cache.set("c".to_string(), result_for(Platform::Twitter, "3"));
        cache.set("a".to_string(), result_for(Platform::Twitter, "1-again"));
        cache.set("d".to_string(), result_for(Platform::Twitter, "4"));
        // "b" was the oldest once "a" moved to the back.
        assert!(cache.get("b").is_none());
        assert_eq!(cache.get("a").unwrap().content.as_deref(), Some("1-again"));
    }

    #[test]
    fn test_key_is_stable_for_equal_inputs() {
        let profile = BrandProfile {
            company_name: "Acme".to_string(),
            tone: "Casual".to_string(),
            ..Default::default()
        };
        let brief = ContentBrief {
            topic: "launch".to_string(),
            ..Default::default()
        };
        let k1 = generate_key(&profile, &brief, Platform::Instagram);
        let k2 = generate_key(&profile.clone(), &brief.clone(), Platform::Instagram);
        assert_eq!(k1, k2);
        assert_ne!(k1, generate_key(&profile, &brief, Platform::Twitter));
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = ResultCache::default();
        cache.set("a".to_string(), result_for(Platform::Twitter, "1"));
        cache.set("b".to_string(), result_for(Platform::Twitter, "2"));
        cache.remove("a");
        assert!(cache.get("a").is_none());
        cache.clear();
        assert_eq!(cache.stats().size, 0);
    }
}
