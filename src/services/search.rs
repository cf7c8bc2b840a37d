//! Search service for the museum catalog
//!
//! Provides searches by department, artist name, and nationality. Result id
//! lists and hydrated artwork records go through the shared cache; only the
//! first [`DETAIL_FETCH_LIMIT`] ids of a result list are hydrated into full
//! records, concurrently, with individual failures skipped.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::DataStore;
use crate::data::{canonical_nationality, Artwork, Department, MetApiError, MetClient};

/// Maximum number of ids per result list hydrated into full records
pub const DETAIL_FETCH_LIMIT: usize = 20;

/// Errors raised by search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// Department ids are positive integers
    #[error("Invalid department id: {0}")]
    InvalidDepartment(u32),

    /// The nationality is not in the supported list
    #[error("Unsupported nationality: '{0}'")]
    UnknownNationality(String),

    /// The query was empty after trimming
    #[error("Search query must not be empty")]
    EmptyQuery,

    /// The remote API failed; never cached, so a retry hits the network
    #[error(transparent)]
    Api(#[from] MetApiError),
}

/// Cache-aware search over the museum collection
#[derive(Debug, Clone)]
pub struct SearchService {
    client: MetClient,
    store: Arc<DataStore>,
}

impl SearchService {
    /// Creates a search service around the shared store
    ///
    /// # Arguments
    /// * `client` - The collection API client used on cache misses
    /// * `store` - The shared cache, injected so every service sees the
    ///   same entries
    pub fn new(client: MetClient, store: Arc<DataStore>) -> Self {
        Self { client, store }
    }

    /// Returns the museum department list, cached for its category TTL
    pub async fn departments(&self) -> Result<Vec<Department>, SearchError> {
        if let Some(departments) = self.store.get_departments() {
            return Ok(departments);
        }

        let departments = self.client.fetch_departments().await?;
        self.store.put_departments(departments.clone());
        Ok(departments)
    }

    /// Returns artworks belonging to a department
    ///
    /// The department's id list and each hydrated artwork are cached
    /// independently, so a later artist search touching the same objects is
    /// served without refetching them.
    pub async fn search_by_department(
        &self,
        department_id: u32,
    ) -> Result<Vec<Artwork>, SearchError> {
        if department_id == 0 {
            return Err(SearchError::InvalidDepartment(department_id));
        }

        let object_ids = match self.store.get_department_ids(department_id) {
            Some(ids) => ids,
            None => {
                let ids = self.client.fetch_department_object_ids(department_id).await?;
                self.store.put_department_ids(department_id, ids.clone());
                ids
            }
        };

        debug!(department_id, results = object_ids.len(), "department search");
        Ok(self.hydrate_artworks(&object_ids).await)
    }

    /// Returns artworks whose artist matches the given name
    ///
    /// The name is trimmed and lowercased before it becomes the search key,
    /// so "Vermeer" and "  vermeer " share one cache entry. Hydrated
    /// results are filtered to artists actually containing the name, since
    /// the free-text search also matches titles and descriptions.
    pub async fn search_by_artist(&self, name: &str) -> Result<Vec<Artwork>, SearchError> {
        let normalized = normalize_query(name);
        if normalized.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let key = format!("artist:{normalized}");
        let object_ids = match self.store.get_search(&key) {
            Some(ids) => ids,
            None => {
                let ids = self.client.search_objects(&normalized, None).await?;
                self.store.put_search(key, ids.clone());
                ids
            }
        };

        debug!(query = %normalized, results = object_ids.len(), "artist search");
        let artworks = self.hydrate_artworks(&object_ids).await;
        Ok(artworks
            .into_iter()
            .filter(|artwork| artist_matches(&artwork.artist.name, &normalized))
            .collect())
    }

    /// Returns artworks by artists of the given nationality
    ///
    /// The nationality must be one of the supported values; matching
    /// against the artist's reported nationality is a case-insensitive
    /// substring test because the API mixes forms like "Dutch" and
    /// "Dutch, active France".
    pub async fn search_by_nationality(
        &self,
        nationality: &str,
    ) -> Result<Vec<Artwork>, SearchError> {
        let canonical = canonical_nationality(nationality)
            .ok_or_else(|| SearchError::UnknownNationality(nationality.trim().to_string()))?;

        let key = format!("nationality:{}", canonical.to_ascii_lowercase());
        let object_ids = match self.store.get_search(&key) {
            Some(ids) => ids,
            None => {
                let ids = self.client.search_objects(canonical, None).await?;
                self.store.put_search(key, ids.clone());
                ids
            }
        };

        debug!(nationality = canonical, results = object_ids.len(), "nationality search");
        let artworks = self.hydrate_artworks(&object_ids).await;
        let needle = canonical.to_ascii_lowercase();
        Ok(artworks
            .into_iter()
            .filter(|artwork| {
                artwork
                    .artist
                    .nationality
                    .as_ref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .collect())
    }

    /// Hydrates the first [`DETAIL_FETCH_LIMIT`] ids into artwork records
    ///
    /// Cache hits are served directly; misses are fetched concurrently and
    /// cached on success. Objects that fail to fetch are logged and skipped
    /// rather than failing the whole result.
    async fn hydrate_artworks(&self, object_ids: &[u32]) -> Vec<Artwork> {
        let ids: Vec<u32> = object_ids
            .iter()
            .take(DETAIL_FETCH_LIMIT)
            .copied()
            .collect();

        let mut hydrated: HashMap<u32, Artwork> = HashMap::new();
        let mut missing: Vec<u32> = Vec::new();
        for &id in &ids {
            match self.store.get_artwork(id) {
                Some(artwork) => {
                    hydrated.insert(id, artwork);
                }
                None => missing.push(id),
            }
        }

        let fetches = missing.iter().map(|&id| self.client.fetch_object(id));
        let results = futures::future::join_all(fetches).await;
        for (&id, result) in missing.iter().zip(results) {
            match result {
                Ok(artwork) => {
                    self.store.put_artwork(artwork.clone());
                    hydrated.insert(id, artwork);
                }
                Err(err) => {
                    warn!(object_id = id, %err, "skipping artwork that failed to hydrate")
                }
            }
        }

        // Preserve the result-list order
        ids.iter().filter_map(|id| hydrated.remove(id)).collect()
    }
}

/// Normalizes a free-text query: trimmed, lowercased
fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Case-insensitive containment test between artist name and query
fn artist_matches(artist_name: &str, normalized_query: &str) -> bool {
    artist_name.to_lowercase().contains(normalized_query)
}
