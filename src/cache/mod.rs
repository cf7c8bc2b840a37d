//! Shared in-memory cache for museum API lookups
//!
//! This module provides the data store that sits between the search/detail
//! services and the Met Museum API client. It absorbs repeated and bursty
//! lookups with per-category TTLs, bounds memory with a global entry
//! ceiling, and stays safe under concurrent access from multiple services.
//! Entries expire lazily on read; there are no background sweeper threads.

mod entry;
mod stats;
mod store;


pub use entry::CacheEntry;
pub use stats::{CacheSnapshot, CategoryStats};
pub use store::{
    CacheError, Category, CleanupReport, DataStore, ARTWORK_TTL, DEFAULT_CAPACITY,
    DEPARTMENT_IDS_TTL, DEPARTMENT_TTL, SEARCH_TTL,
};
