//! Short-TTL memo of full responses keyed by normalized request.
//!
//! The cache is an injected abstraction so it can be backed by something
//! distributed later without touching scoring. Entries are never updated in
//! place: a miss recomputes fully, and whichever concurrent computation
//! finishes last simply overwrites — acceptable at a 60 second TTL.

use std::collections::HashMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use meetspot_common::{Intent, PlaceKind};

/// Fixed (non-sliding) entry lifetime.
pub const CACHE_TTL_MS: i64 = 60_000;

#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// The stored payload if present and unexpired, verbatim.
    async fn get(&self, key: &str) -> Option<serde_json::Value>;
    async fn set(&self, key: String, payload: serde_json::Value);
}

/// Composite request key: intent, coordinates rounded to 4 decimal places
/// (~11m), result cap, sorted excluded kinds, and a hash of the normalized
/// free text.
pub fn cache_key(
    intent: Intent,
    lat: f64,
    lon: f64,
    max_results: usize,
    excluded: &[PlaceKind],
    text: &str,
) -> String {
    let mut kinds: Vec<String> = excluded.iter().map(|k| k.to_string()).collect();
    kinds.sort();

    let normalized: String = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let text_hash = hex::encode(Sha256::digest(normalized.as_bytes()));

    format!(
        "{intent}|{lat:.4}|{lon:.4}|{max_results}|{}|{}",
        kinds.join(","),
        &text_hash[..16]
    )
}

struct CacheEntry {
    inserted_at_ms: i64,
    payload: serde_json::Value,
}

/// Process-wide in-memory cache. No size bound; the TTL and the sweep on
/// write keep it small in practice.
#[derive(Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[async_trait]
impl ResponseCache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let now = Self::now_ms();
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if now - entry.inserted_at_ms >= CACHE_TTL_MS {
            return None;
        }
        Some(entry.payload.clone())
    }

    async fn set(&self, key: String, payload: serde_json::Value) {
        let now = Self::now_ms();
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| now - e.inserted_at_ms < CACHE_TTL_MS);
        entries.insert(
            key,
            CacheEntry {
                inserted_at_ms: now,
                payload,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn hit_returns_stored_payload_verbatim() {
        let cache = InMemoryCache::new();
        let payload = json!({"results": [1, 2, 3], "note": ""});
        cache.set("k".to_string(), payload.clone()).await;
        assert_eq!(cache.get("k").await, Some(payload));
        assert_eq!(cache.get("other").await, None);
    }

    #[tokio::test]
    async fn expired_entries_miss() {
        let cache = InMemoryCache::new();
        {
            let mut entries = cache.entries.write().await;
            entries.insert(
                "old".to_string(),
                CacheEntry {
                    inserted_at_ms: InMemoryCache::now_ms() - CACHE_TTL_MS - 1,
                    payload: json!(1),
                },
            );
        }
        assert_eq!(cache.get("old").await, None);
    }

    #[tokio::test]
    async fn write_sweeps_expired_entries() {
        let cache = InMemoryCache::new();
        {
            let mut entries = cache.entries.write().await;
            entries.insert(
                "old".to_string(),
                CacheEntry {
                    inserted_at_ms: InMemoryCache::now_ms() - CACHE_TTL_MS - 1,
                    payload: json!(1),
                },
            );
        }
        cache.set("new".to_string(), json!(2)).await;
        let entries = cache.entries.read().await;
        assert!(!entries.contains_key("old"));
        assert!(entries.contains_key("new"));
    }

    #[test]
    fn key_ignores_whitespace_and_case_in_text() {
        let a = cache_key(Intent::FirstDate, 44.9778, -93.265, 5, &[], "First   DATE ");
        let b = cache_key(Intent::FirstDate, 44.9778, -93.265, 5, &[], "first date");
        assert_eq!(a, b);
    }

    #[test]
    fn key_is_sensitive_to_excluded_kinds_but_not_their_order() {
        let ab = cache_key(
            Intent::GeneralMeetup,
            44.9778,
            -93.265,
            5,
            &[PlaceKind::Cafe, PlaceKind::Bank],
            "hi",
        );
        let ba = cache_key(
            Intent::GeneralMeetup,
            44.9778,
            -93.265,
            5,
            &[PlaceKind::Bank, PlaceKind::Cafe],
            "hi",
        );
        let none = cache_key(Intent::GeneralMeetup, 44.9778, -93.265, 5, &[], "hi");
        assert_eq!(ab, ba);
        assert_ne!(ab, none);
    }

    #[test]
    fn key_rounds_coordinates() {
        let a = cache_key(Intent::NightWalk, 44.97781, -93.26501, 5, &[], "x");
        let b = cache_key(Intent::NightWalk, 44.97779, -93.26499, 5, &[], "x");
        assert_eq!(a, b);
    }
}
