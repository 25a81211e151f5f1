//! In-process LRU+TTL cache for the expected-points table and player lookups.

use crate::cli::types::PlayerId;
use crate::config::PlannerConfig;
use crate::model::{ExpectedPointsTable, Player};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Capacity of the xp-table cache: one entry per distinct (gameweek, horizon)
/// pair a caller has recently planned for.
const XP_CACHE_CAPACITY: usize = 32;
/// Capacity of the player-lookup cache: comfortably above the ~700 elements
/// the upstream bootstrap currently reports.
const PLAYER_CACHE_CAPACITY: usize = 1024;

struct Entry<V> {
    value: V,
    written_at: Instant,
}

/// A bounded LRU cache where entries also expire after a fixed TTL.
pub struct TtlCache<K: std::hash::Hash + Eq, V: Clone> {
    inner: LruCache<K, Entry<V>>,
    ttl: Duration,
}

impl<K: std::hash::Hash + Eq, V: Clone> TtlCache<K, V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: LruCache::new(NonZeroUsize::new(capacity.max(1)).unwrap()),
            ttl,
        }
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        let expired = match self.inner.get(key) {
            Some(entry) => entry.written_at.elapsed() >= self.ttl,
            None => return None,
        };
        if expired {
            self.inner.pop(key);
            return None;
        }
        self.inner.get(key).map(|e| e.value.clone())
    }

    pub fn put(&mut self, key: K, value: V) {
        self.inner.put(
            key,
            Entry {
                value,
                written_at: Instant::now(),
            },
        );
    }
}

/// The two in-process caches the plan pipeline shares across invocations
/// within one running process: the expected-points table keyed by
/// `(next_gameweek, horizon)`, and individual decoded players keyed by id
/// (`spec.md` §5's "expected-points table 10 min, player lookup 10 min").
/// Explicit, passed-in state rather than a global, matching `PlannerConfig`'s
/// own no-singleton design.
pub struct PlannerCaches {
    pub xp: Mutex<TtlCache<(u16, u8), ExpectedPointsTable>>,
    pub players: Mutex<TtlCache<PlayerId, Player>>,
}

impl PlannerCaches {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            xp: Mutex::new(TtlCache::new(XP_CACHE_CAPACITY, config.cache_ttls.expected_points)),
            players: Mutex::new(TtlCache::new(PLAYER_CACHE_CAPACITY, config.cache_ttls.player_lookup)),
        }
    }
}
