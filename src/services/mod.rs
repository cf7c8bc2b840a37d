//! Business services for search and artwork detail lookups
//!
//! Every service follows the same cache discipline: ask the shared store
//! first, populate it on a miss, and propagate remote-client errors without
//! caching anything. Services hold no private caches; they all share the
//! one injected `DataStore`.

pub mod artworks;
pub mod search;

pub use artworks::{ArtworkService, ArtworkServiceError};
pub use search::{SearchError, SearchService};
