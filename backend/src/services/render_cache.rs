//! Time-bounded cache of rendered heatmaps.
//!
//! Entries are keyed by [`RenderKey`] and expire after a fixed TTL measured
//! with an injected [`Clock`], so tests can move time forward without
//! sleeping. Editing or deleting a heatmap should call
//! [`RenderCache::invalidate`].
//!
//! Each heatmap also has a generation counter that `invalidate` bumps. A
//! render reads the generation before loading the heatmap and passes it to
//! [`RenderCache::insert`], which refuses the value if the heatmap was
//! invalidated in between.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{Clock, HeatmapId, HeatmapPeriod};

/// Default lifetime of a cached render.
pub const DEFAULT_TTL_SECS: i64 = 5 * 60;

/// Identifies one rendered view of a heatmap.
///
/// Trailing windows end on the render date, so they also carry that date;
/// a calendar year renders the same on any day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderKey {
    pub heatmap_id: HeatmapId,
    pub period: HeatmapPeriod,
    window_end: Option<NaiveDate>,
}

impl RenderKey {
    pub fn new(heatmap_id: HeatmapId, period: HeatmapPeriod, today: NaiveDate) -> Self {
        let window_end = match period {
            HeatmapPeriod::Trailing365 => Some(today),
            HeatmapPeriod::Year { .. } => None,
        };
        Self {
            heatmap_id,
            period,
            window_end,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

struct CacheState<V> {
    entries: HashMap<RenderKey, CacheEntry<V>>,
    generations: HashMap<HeatmapId, u64>,
}

impl<V> CacheState<V> {
    fn generation(&self, id: HeatmapId) -> u64 {
        self.generations.get(&id).copied().unwrap_or(0)
    }
}

/// In-memory render cache, cheap to clone and share between handlers.
#[derive(Clone)]
pub struct RenderCache<V> {
    state: Arc<RwLock<CacheState<V>>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<V: Clone> RenderCache<V> {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState {
                entries: HashMap::new(),
                generations: HashMap::new(),
            })),
            clock,
            ttl,
        }
    }

    pub fn with_default_ttl(clock: Arc<dyn Clock>) -> Self {
        Self::new(clock, Duration::seconds(DEFAULT_TTL_SECS))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached value for the key, if it has not expired.
    pub fn get(&self, key: &RenderKey) -> Option<V> {
        let now = self.clock.now();
        let state = self.state.read();
        state
            .entries
            .get(key)
            .filter(|entry| now - entry.inserted_at < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Current generation of `id`. Read it before loading the heatmap.
    pub fn generation(&self, id: HeatmapId) -> u64 {
        self.state.read().generation(id)
    }

    /// Store `value` unless the heatmap was invalidated after `generation`
    /// was read. Returns whether the value was stored.
    pub fn insert(&self, key: RenderKey, generation: u64, value: V) -> bool {
        let mut state = self.state.write();
        if state.generation(key.heatmap_id) != generation {
            log::debug!("Dropped stale render of heatmap {}", key.heatmap_id);
            return false;
        }
        let entry = CacheEntry {
            value,
            inserted_at: self.clock.now(),
        };
        state.entries.insert(key, entry);
        true
    }

    /// Drop every view cached for `id` and start a new generation.
    pub fn invalidate(&self, id: HeatmapId) {
        let mut state = self.state.write();
        let before = state.entries.len();
        state.entries.retain(|key, _| key.heatmap_id != id);
        let removed = before - state.entries.len();
        *state.generations.entry(id).or_default() += 1;
        if removed > 0 {
            log::debug!("Invalidated {} cached render(s) for heatmap {}", removed, id);
        }
    }

    /// Remove expired entries and return how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let mut state = self.state.write();
        let before = state.entries.len();
        state.entries.retain(|_, entry| now - entry.inserted_at < ttl);
        before - state.entries.len()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }
}
