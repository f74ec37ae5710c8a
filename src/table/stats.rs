//! Per-table access statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters tracked by a table handle.
///
/// All fields are atomic so read-only operations (`&self`) can record file
/// loads. Counters live in memory only and start at zero for every handle.
///
/// # Memory Ordering
/// `Ordering::Relaxed` everywhere: counters are independent and only need
/// atomicity.
///
/// # Example
/// ```
/// use tablestore::TableStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = TableStats::new();
/// stats.hits.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.hits.load(Ordering::Relaxed), 1);
/// ```
#[derive(Debug)]
pub struct TableStats {
    /// Keyed lookups (`get`, `put`, `remove`) that found the key.
    pub hits: AtomicU64,

    /// Keyed lookups that did not find the key.
    pub misses: AtomicU64,

    /// Hits where the access heuristic moved the row toward the front.
    pub promotions: AtomicU64,

    /// Full reads of the backing file.
    pub file_loads: AtomicU64,

    /// Full rewrites of the backing file.
    pub file_writes: AtomicU64,
}

impl TableStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            promotions: AtomicU64::new(0),
            file_loads: AtomicU64::new(0),
            file_writes: AtomicU64::new(0),
        }
    }

    /// Fraction of keyed lookups that hit (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        self.snapshot().hit_rate()
    }

    /// Get a non-atomic copy for display/logging.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            file_loads: self.file_loads.load(Ordering::Relaxed),
            file_writes: self.file_writes.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.promotions.store(0, Ordering::Relaxed);
        self.file_loads.store(0, Ordering::Relaxed);
        self.file_writes.store(0, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_lookup(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_promotion(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_load(&self) {
        self.file_loads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_write(&self) {
        self.file_writes.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for TableStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of table statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub promotions: u64,
    pub file_loads: u64,
    pub file_writes: u64,
}

impl StatsSnapshot {
    /// Fraction of keyed lookups that hit (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ hits: {}, misses: {}, promotions: {}, loads: {}, writes: {}, hit_rate: {:.2}% }}",
            self.hits,
            self.misses,
            self.promotions,
            self.file_loads,
            self.file_writes,
            self.hit_rate() * 100.0
        )
    }
}
