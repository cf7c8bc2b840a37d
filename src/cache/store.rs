//! Shared in-memory data store with per-category TTLs and a global size cap
//!
//! The store owns four independent category tables (artworks, departments,
//! search results, department id lists), each an instance of the same
//! generic TTL table. A single coarse mutex serializes all access; the
//! workload is read-mostly and every operation is short-held, so one lock
//! per store is enough. Nothing here performs network or disk I/O.
//!
//! Expired entries are purged opportunistically on access, and a cleanup
//! pass runs synchronously whenever an insert pushes the total entry count
//! over the configured ceiling. There are no background threads or timers.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use super::entry::CacheEntry;
use super::stats::{CacheSnapshot, CategoryStats};
use crate::data::{Artwork, Department};

/// Default ceiling on total entries across all categories
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default TTL for cached artwork detail records
pub const ARTWORK_TTL: Duration = Duration::from_secs(600);
/// Default TTL for the cached department list
pub const DEPARTMENT_TTL: Duration = Duration::from_secs(1800);
/// Default TTL for cached search-result id lists
pub const SEARCH_TTL: Duration = Duration::from_secs(300);
/// Default TTL for cached department id lists
pub const DEPARTMENT_IDS_TTL: Duration = Duration::from_secs(180);

/// Key under which the single department list entry is stored
const DEPARTMENTS_KEY: &str = "all";

/// Errors raised by store construction
///
/// Lookups never error: a miss is a normal outcome reported through
/// `Option`, and `put` always succeeds (capacity is enforced by evicting
/// other entries, never by rejecting the insert).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    /// The configured entry ceiling was zero
    #[error("cache capacity must be at least 1 entry")]
    InvalidCapacity,
}

/// The four independent cache partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Artwork detail records keyed by object id
    Artworks,
    /// The museum department list
    Departments,
    /// Search-result id lists keyed by normalized query
    Searches,
    /// Department id lists keyed by department id
    DepartmentIds,
}

/// What a cleanup pass removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Expired artwork entries dropped
    pub expired_artworks: usize,
    /// Expired department list entries dropped
    pub expired_departments: usize,
    /// Expired search entries dropped
    pub expired_searches: usize,
    /// Expired department id list entries dropped
    pub expired_department_ids: usize,
    /// Unexpired entries evicted oldest-first to satisfy the ceiling
    pub capacity_evictions: usize,
}

impl CleanupReport {
    /// Total entries removed by the pass
    pub fn total_removed(&self) -> usize {
        self.expired_artworks
            + self.expired_departments
            + self.expired_searches
            + self.expired_department_ids
            + self.capacity_evictions
    }
}

/// One category table: a keyed map of TTL entries plus its own counters
///
/// All four categories share this one implementation, parameterized by key
/// and payload type; only the default TTL differs between instances.
#[derive(Debug)]
struct CacheTable<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    default_ttl: Duration,
    hits: u64,
    misses: u64,
}

impl<K: Eq + Hash + Clone, V: Clone> CacheTable<K, V> {
    fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
            hits: 0,
            misses: 0,
        }
    }

    /// Looks up a key, purging it if its entry has expired
    ///
    /// Absent and expired-on-read both count as misses; a fresh entry counts
    /// as a hit and returns a clone of the payload.
    fn get(&mut self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.hits += 1;
                let (payload, _) = entry.value();
                Some(payload.clone())
            }
            Some(_) => {
                // Lazy expiry: drop the stale entry on access
                self.entries.remove(key);
                self.misses += 1;
                None
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Inserts or replaces an entry, resetting its creation timestamp
    fn insert(&mut self, key: K, payload: V, ttl: Duration) {
        self.entries.insert(key, CacheEntry::new(payload, ttl));
    }

    /// Removes an entry if present; returns whether removal occurred
    fn remove(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drops every entry and resets the table's hit/miss counters
    fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Removes every expired entry; returns how many were dropped
    fn prune_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    /// Creation instant of the oldest entry, if any
    fn oldest_created_at(&self) -> Option<Instant> {
        self.entries.values().map(|entry| entry.created_at()).min()
    }

    /// Evicts the entry with the oldest creation instant
    fn evict_oldest(&mut self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.created_at())
            .map(|(key, _)| key.clone());
        match oldest {
            Some(key) => self.entries.remove(&key).is_some(),
            None => false,
        }
    }

    fn stats(&self) -> CategoryStats {
        CategoryStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// Everything guarded by the store mutex
#[derive(Debug)]
struct StoreInner {
    artworks: CacheTable<u32, Artwork>,
    departments: CacheTable<String, Vec<Department>>,
    searches: CacheTable<String, Vec<u32>>,
    department_ids: CacheTable<u32, Vec<u32>>,
    capacity: usize,
    automatic_cleanups: u64,
}

impl StoreInner {
    fn total_entries(&self) -> usize {
        self.artworks.len()
            + self.departments.len()
            + self.searches.len()
            + self.department_ids.len()
    }

    /// Evicts the globally oldest entry across all four categories
    fn evict_globally_oldest(&mut self) -> bool {
        let candidates = [
            (Category::Artworks, self.artworks.oldest_created_at()),
            (Category::Departments, self.departments.oldest_created_at()),
            (Category::Searches, self.searches.oldest_created_at()),
            (
                Category::DepartmentIds,
                self.department_ids.oldest_created_at(),
            ),
        ];

        let target = candidates
            .into_iter()
            .filter_map(|(category, created)| created.map(|c| (category, c)))
            .min_by_key(|(_, created)| *created)
            .map(|(category, _)| category);

        match target {
            Some(Category::Artworks) => self.artworks.evict_oldest(),
            Some(Category::Departments) => self.departments.evict_oldest(),
            Some(Category::Searches) => self.searches.evict_oldest(),
            Some(Category::DepartmentIds) => self.department_ids.evict_oldest(),
            None => false,
        }
    }

    /// One cleanup pass: drop expired entries everywhere, then evict
    /// oldest-first until the total is back at or below the ceiling.
    ///
    /// The pass counter increments once per pass, however many entries were
    /// removed, and whether the pass was triggered by capacity or invoked
    /// manually.
    fn run_cleanup_pass(&mut self) -> CleanupReport {
        let mut report = CleanupReport {
            expired_artworks: self.artworks.prune_expired(),
            expired_departments: self.departments.prune_expired(),
            expired_searches: self.searches.prune_expired(),
            expired_department_ids: self.department_ids.prune_expired(),
            capacity_evictions: 0,
        };

        while self.total_entries() > self.capacity {
            if !self.evict_globally_oldest() {
                break;
            }
            report.capacity_evictions += 1;
        }

        self.automatic_cleanups += 1;
        debug!(
            removed = report.total_removed(),
            evicted = report.capacity_evictions,
            remaining = self.total_entries(),
            "cache cleanup pass finished"
        );
        report
    }

    /// Runs a cleanup pass if an insert pushed the total over the ceiling
    fn enforce_capacity(&mut self) {
        if self.total_entries() > self.capacity {
            self.run_cleanup_pass();
            // With a positive ceiling a full pass always restores capacity;
            // anything else is a contract violation.
            debug_assert!(self.total_entries() <= self.capacity);
        }
    }
}

/// Shared cache for artwork, department, and search lookups
///
/// One `DataStore` is constructed at startup and handed (via `Arc`) to every
/// service that needs caching; services never hold private caches of the
/// same data, so an artwork fetched while hydrating search results is
/// immediately visible to the detail service. The store never calls the
/// remote API: population on miss is always the caller's responsibility.
#[derive(Debug)]
pub struct DataStore {
    inner: Mutex<StoreInner>,
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore {
    /// Creates a store with the default entry ceiling
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY).expect("default capacity is positive")
    }

    /// Creates a store with a custom entry ceiling
    ///
    /// # Arguments
    /// * `capacity` - Maximum total entries across all categories; must be
    ///   at least 1
    ///
    /// # Returns
    /// * `Err(CacheError::InvalidCapacity)` if `capacity` is zero
    pub fn with_capacity(capacity: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity);
        }
        Ok(Self {
            inner: Mutex::new(StoreInner {
                artworks: CacheTable::new(ARTWORK_TTL),
                departments: CacheTable::new(DEPARTMENT_TTL),
                searches: CacheTable::new(SEARCH_TTL),
                department_ids: CacheTable::new(DEPARTMENT_IDS_TTL),
                capacity,
                automatic_cleanups: 0,
            }),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        // A poisoned lock means a panic mid-operation; treat as fatal
        self.inner.lock().expect("cache mutex poisoned")
    }

    /// Returns a cached artwork if present and fresh
    pub fn get_artwork(&self, object_id: u32) -> Option<Artwork> {
        self.lock().artworks.get(&object_id)
    }

    /// Caches an artwork under its object id with the category default TTL
    pub fn put_artwork(&self, artwork: Artwork) {
        self.put_artwork_with_ttl(artwork, ARTWORK_TTL);
    }

    /// Caches an artwork with an explicit TTL
    pub fn put_artwork_with_ttl(&self, artwork: Artwork, ttl: Duration) {
        let mut inner = self.lock();
        inner.artworks.insert(artwork.id, artwork, ttl);
        inner.enforce_capacity();
    }

    /// Returns the cached department list if present and fresh
    pub fn get_departments(&self) -> Option<Vec<Department>> {
        self.lock().departments.get(&DEPARTMENTS_KEY.to_string())
    }

    /// Caches the department list with the category default TTL
    pub fn put_departments(&self, departments: Vec<Department>) {
        self.put_departments_with_ttl(departments, DEPARTMENT_TTL);
    }

    /// Caches the department list with an explicit TTL
    pub fn put_departments_with_ttl(&self, departments: Vec<Department>, ttl: Duration) {
        let mut inner = self.lock();
        inner
            .departments
            .insert(DEPARTMENTS_KEY.to_string(), departments, ttl);
        inner.enforce_capacity();
    }

    /// Returns a cached search-result id list if present and fresh
    ///
    /// Keys are derived (and normalized) by the caller; the store treats
    /// them as opaque.
    pub fn get_search(&self, key: &str) -> Option<Vec<u32>> {
        self.lock().searches.get(&key.to_string())
    }

    /// Caches a search-result id list with the category default TTL
    pub fn put_search(&self, key: impl Into<String>, object_ids: Vec<u32>) {
        self.put_search_with_ttl(key, object_ids, SEARCH_TTL);
    }

    /// Caches a search-result id list with an explicit TTL
    pub fn put_search_with_ttl(&self, key: impl Into<String>, object_ids: Vec<u32>, ttl: Duration) {
        let mut inner = self.lock();
        inner.searches.insert(key.into(), object_ids, ttl);
        inner.enforce_capacity();
    }

    /// Returns a cached department id list if present and fresh
    pub fn get_department_ids(&self, department_id: u32) -> Option<Vec<u32>> {
        self.lock().department_ids.get(&department_id)
    }

    /// Caches a department id list with the category default TTL
    pub fn put_department_ids(&self, department_id: u32, object_ids: Vec<u32>) {
        self.put_department_ids_with_ttl(department_id, object_ids, DEPARTMENT_IDS_TTL);
    }

    /// Caches a department id list with an explicit TTL
    pub fn put_department_ids_with_ttl(
        &self,
        department_id: u32,
        object_ids: Vec<u32>,
        ttl: Duration,
    ) {
        let mut inner = self.lock();
        inner.department_ids.insert(department_id, object_ids, ttl);
        inner.enforce_capacity();
    }

    /// Removes a single cached artwork; returns whether it was present
    pub fn invalidate_artwork(&self, object_id: u32) -> bool {
        self.lock().artworks.remove(&object_id)
    }

    /// Removes the cached department list; returns whether it was present
    pub fn invalidate_departments(&self) -> bool {
        self.lock().departments.remove(&DEPARTMENTS_KEY.to_string())
    }

    /// Removes a single cached search result; returns whether it was present
    #[allow(dead_code)]
    pub fn invalidate_search(&self, key: &str) -> bool {
        self.lock().searches.remove(&key.to_string())
    }

    /// Removes a single cached department id list; returns whether it was
    /// present
    #[allow(dead_code)]
    pub fn invalidate_department_ids(&self, department_id: u32) -> bool {
        self.lock().department_ids.remove(&department_id)
    }

    /// Clears one category, or the whole store when `category` is `None`
    ///
    /// Clearing a category resets that category's hit/miss counters; a full
    /// clear also resets the cleanup-pass counter. Manual clearing is
    /// distinct from automatic cleanup and increments nothing.
    pub fn clear(&self, category: Option<Category>) {
        let mut inner = self.lock();
        match category {
            Some(Category::Artworks) => inner.artworks.clear(),
            Some(Category::Departments) => inner.departments.clear(),
            Some(Category::Searches) => inner.searches.clear(),
            Some(Category::DepartmentIds) => inner.department_ids.clear(),
            None => {
                inner.artworks.clear();
                inner.departments.clear();
                inner.searches.clear();
                inner.department_ids.clear();
                inner.automatic_cleanups = 0;
            }
        }
    }

    /// Runs a cleanup pass immediately and reports what it removed
    pub fn cleanup(&self) -> CleanupReport {
        self.lock().run_cleanup_pass()
    }

    /// Takes a consistent snapshot of all counters and entry counts
    pub fn snapshot(&self) -> CacheSnapshot {
        let inner = self.lock();
        CacheSnapshot {
            artworks: inner.artworks.stats(),
            departments: inner.departments.stats(),
            searches: inner.searches.stats(),
            department_ids: inner.department_ids.stats(),
            automatic_cleanups: inner.automatic_cleanups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Artist, Artwork};
    use chrono::Utc;
    use std::sync::Arc;
    use std::thread;

    fn test_artwork(id: u32) -> Artwork {
        Artwork {
            id,
            title: format!("Artwork {id}"),
            artist: Artist {
                name: "Test Artist".to_string(),
                nationality: None,
                birth_year: None,
                death_year: None,
            },
            classification: None,
            date: None,
            department: None,
            image_url: None,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_get_before_put_is_miss() {
        let store = DataStore::new();

        assert!(store.get_artwork(1).is_none());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.artworks.misses, 1);
        assert_eq!(snapshot.artworks.hits, 0);
    }

    #[test]
    fn test_put_then_get_is_hit() {
        let store = DataStore::new();
        store.put_artwork(test_artwork(7));

        let artwork = store.get_artwork(7).expect("fresh entry should hit");
        assert_eq!(artwork.id, 7);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.artworks.hits, 1);
        assert_eq!(snapshot.artworks.misses, 0);
    }

    #[test]
    fn test_zero_ttl_put_then_get_is_deterministic_miss() {
        let store = DataStore::new();
        store.put_artwork_with_ttl(test_artwork(3), Duration::ZERO);

        assert!(store.get_artwork(3).is_none());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.artworks.misses, 1);
        // The expired entry was purged on access
        assert_eq!(snapshot.artworks.entries, 0);
    }

    #[test]
    fn test_expired_entry_is_purged_on_access() {
        let store = DataStore::new();
        store.put_search_with_ttl("monet", vec![1, 2], Duration::from_millis(20));

        thread::sleep(Duration::from_millis(30));

        assert!(store.get_search("monet").is_none());
        assert_eq!(store.snapshot().searches.entries, 0);
    }

    #[test]
    fn test_fresh_entry_hits_within_ttl() {
        let store = DataStore::new();
        store.put_search_with_ttl("vermeer", vec![9], Duration::from_secs(60));

        assert_eq!(store.get_search("vermeer"), Some(vec![9]));
    }

    #[test]
    fn test_reput_replaces_entry_and_timestamp() {
        let store = DataStore::new();
        store.put_search_with_ttl("degas", vec![1], Duration::ZERO);
        // Re-put with a fresh TTL replaces the already-expired entry
        store.put_search("degas", vec![2]);

        assert_eq!(store.get_search("degas"), Some(vec![2]));
    }

    #[test]
    fn test_cross_category_key_isolation() {
        let store = DataStore::new();
        store.put_department_ids(11, vec![100, 200]);

        assert!(store.get_artwork(11).is_none());
        assert_eq!(store.get_department_ids(11), Some(vec![100, 200]));
    }

    #[test]
    fn test_invalidate_reports_presence() {
        let store = DataStore::new();
        store.put_search("picasso", vec![5]);

        assert!(store.invalidate_search("picasso"));
        assert!(!store.invalidate_search("picasso"));
        assert!(store.get_search("picasso").is_none());
    }

    #[test]
    fn test_invalidate_does_not_touch_counters() {
        let store = DataStore::new();
        store.put_search("goya", vec![5]);
        store.invalidate_search("goya");

        let snapshot = store.snapshot();
        assert_eq!(snapshot.searches.hits, 0);
        assert_eq!(snapshot.searches.misses, 0);
    }

    #[test]
    fn test_clear_category_resets_its_counters_only() {
        let store = DataStore::new();
        store.put_search("manet", vec![1]);
        store.get_search("manet");
        store.get_artwork(1);

        store.clear(Some(Category::Searches));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.searches.entries, 0);
        assert_eq!(snapshot.searches.hits, 0);
        assert_eq!(snapshot.artworks.misses, 1, "other categories untouched");
    }

    #[test]
    fn test_full_clear_is_idempotent_and_zeroes_stats() {
        let store = DataStore::new();
        store.put_artwork(test_artwork(1));
        store.put_departments(vec![]);
        store.put_search("q", vec![1]);
        store.put_department_ids(4, vec![2]);
        store.get_artwork(1);
        store.get_artwork(99);
        store.cleanup();

        store.clear(None);
        store.clear(None);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.total_entries(), 0);
        assert_eq!(snapshot.automatic_cleanups, 0);
        for stats in [
            snapshot.artworks,
            snapshot.departments,
            snapshot.searches,
            snapshot.department_ids,
        ] {
            assert_eq!(stats.entries, 0);
            assert_eq!(stats.hits, 0);
            assert_eq!(stats.misses, 0);
        }
    }

    #[test]
    fn test_capacity_invariant_holds_after_every_put() {
        let store = DataStore::with_capacity(5).expect("positive capacity");

        for i in 0..20 {
            store.put_search(format!("query-{i}"), vec![i]);
            assert!(
                store.snapshot().total_entries() <= 5,
                "ceiling breached after put {i}"
            );
        }

        assert!(store.snapshot().automatic_cleanups >= 1);
    }

    #[test]
    fn test_capacity_breach_evicts_oldest_first() {
        let store = DataStore::with_capacity(2).expect("positive capacity");

        store.put_search("oldest", vec![1]);
        thread::sleep(Duration::from_millis(5));
        store.put_search("middle", vec![2]);
        thread::sleep(Duration::from_millis(5));
        store.put_search("newest", vec![3]);

        assert!(store.get_search("oldest").is_none());
        assert_eq!(store.get_search("middle"), Some(vec![2]));
        assert_eq!(store.get_search("newest"), Some(vec![3]));
    }

    #[test]
    fn test_cleanup_prefers_dropping_expired_entries() {
        let store = DataStore::with_capacity(2).expect("positive capacity");

        store.put_search_with_ttl("stale", vec![1], Duration::ZERO);
        store.put_search("live-a", vec![2]);
        // Third insert breaches the ceiling; the expired entry alone
        // restores capacity so both live entries survive
        store.put_search("live-b", vec![3]);

        assert_eq!(store.get_search("live-a"), Some(vec![2]));
        assert_eq!(store.get_search("live-b"), Some(vec![3]));
    }

    #[test]
    fn test_cleanup_counts_passes_not_entries() {
        let store = DataStore::new();
        store.put_search_with_ttl("a", vec![1], Duration::ZERO);
        store.put_search_with_ttl("b", vec![2], Duration::ZERO);

        let report = store.cleanup();
        assert_eq!(report.expired_searches, 2);
        assert_eq!(store.snapshot().automatic_cleanups, 1);

        // A pass that removes nothing still counts
        let report = store.cleanup();
        assert_eq!(report.total_removed(), 0);
        assert_eq!(store.snapshot().automatic_cleanups, 2);
    }

    #[test]
    fn test_hit_miss_accounting_and_ratio() {
        let store = DataStore::new();

        for i in 0..10 {
            assert!(store.get_search(&format!("key-{i}")).is_none());
        }
        for i in 0..10 {
            store.put_search(format!("key-{i}"), vec![i]);
        }
        for i in 0..10 {
            assert!(store.get_search(&format!("key-{i}")).is_some());
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.searches.hits, 10);
        assert_eq!(snapshot.searches.misses, 10);
        assert!((snapshot.searches.hit_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_with_capacity_zero_is_rejected() {
        assert_eq!(
            DataStore::with_capacity(0).unwrap_err(),
            CacheError::InvalidCapacity
        );
    }

    #[test]
    fn test_snapshot_memory_estimate_tracks_counts() {
        let store = DataStore::new();
        store.put_artwork(test_artwork(1));
        store.put_artwork(test_artwork(2));

        assert_eq!(store.snapshot().estimated_memory_kb(), 4);
    }

    #[test]
    fn test_concurrent_access_loses_no_counter_updates() {
        const THREADS: u32 = 8;
        const OPS: u32 = 200;

        let store = Arc::new(DataStore::new());
        let mut handles = Vec::new();

        for t in 0..THREADS {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for i in 0..OPS {
                    // Overlapping key space across threads
                    let key = format!("query-{}", (t + i) % 16);
                    if i % 3 == 0 {
                        store.put_search(key.clone(), vec![i]);
                    }
                    let _ = store.get_search(&key);
                    if i % 7 == 0 {
                        store.invalidate_search(&key);
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().expect("worker thread panicked");
        }

        let snapshot = store.snapshot();
        assert_eq!(
            snapshot.searches.hits + snapshot.searches.misses,
            u64::from(THREADS * OPS),
            "every get must land exactly one counter update"
        );
    }
}
