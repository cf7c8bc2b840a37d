//! Cache statistics and memory estimation
//!
//! Read-only snapshots of hit/miss counters and entry counts, plus a rough
//! per-entry-size memory estimate. Snapshots are taken under the store lock
//! and are safe to hold while rendering diagnostics.

use serde::Serialize;

/// Average payload size per cached artwork, in KB
const ARTWORK_ENTRY_KB: f64 = 2.0;
/// Average payload size per cached department list, in KB
const DEPARTMENT_LIST_ENTRY_KB: f64 = 5.0;
/// Average payload size per cached search-result id list, in KB
const SEARCH_ENTRY_KB: f64 = 0.5;
/// Average payload size per cached department id list, in KB
const ID_LIST_ENTRY_KB: f64 = 1.0;

/// Counters for a single cache category
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CategoryStats {
    /// Live entries currently held in the category table
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing fresh
    pub misses: u64,
}

impl CategoryStats {
    /// Hits divided by total lookups, or 0.0 when no lookups have happened
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Point-in-time view of the whole store's statistics
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CacheSnapshot {
    /// Artwork detail records keyed by object id
    pub artworks: CategoryStats,
    /// Department list entries
    pub departments: CategoryStats,
    /// Search-result id lists keyed by normalized query
    pub searches: CategoryStats,
    /// Department id lists keyed by department id
    pub department_ids: CategoryStats,
    /// Number of cleanup passes that have run since the last full clear
    pub automatic_cleanups: u64,
}

impl CacheSnapshot {
    /// Total live entries across all categories
    pub fn total_entries(&self) -> usize {
        self.artworks.entries
            + self.departments.entries
            + self.searches.entries
            + self.department_ids.entries
    }

    /// Rough memory footprint in KB, from entry counts and per-category
    /// average sizes. A heuristic for the diagnostics view, not accounting.
    pub fn estimated_memory_kb(&self) -> u64 {
        let estimate = self.artworks.entries as f64 * ARTWORK_ENTRY_KB
            + self.departments.entries as f64 * DEPARTMENT_LIST_ENTRY_KB
            + self.searches.entries as f64 * SEARCH_ENTRY_KB
            + self.department_ids.entries as f64 * ID_LIST_ENTRY_KB;
        estimate as u64
    }

    /// Hit ratio across every category combined
    pub fn overall_hit_ratio(&self) -> f64 {
        let hits = self.artworks.hits
            + self.departments.hits
            + self.searches.hits
            + self.department_ids.hits;
        let misses = self.artworks.misses
            + self.departments.misses
            + self.searches.misses
            + self.department_ids.misses;
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}
