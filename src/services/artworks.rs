//! Artwork detail service
//!
//! Single-object lookups through the shared cache. Because the store is
//! shared, an artwork hydrated during a search is already a hit here and
//! never refetched within its TTL.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::cache::DataStore;
use crate::data::{Artwork, MetApiError, MetClient};

/// Errors raised by artwork detail lookups
#[derive(Debug, Error)]
pub enum ArtworkServiceError {
    /// Object ids are positive integers
    #[error("Invalid object id: {0}")]
    InvalidId(u32),

    /// The remote API failed; the result is not cached
    #[error(transparent)]
    Api(#[from] MetApiError),
}

/// Cache-aware artwork detail lookups
#[derive(Debug, Clone)]
pub struct ArtworkService {
    client: MetClient,
    store: Arc<DataStore>,
}

impl ArtworkService {
    /// Creates a detail service around the shared store
    pub fn new(client: MetClient, store: Arc<DataStore>) -> Self {
        Self { client, store }
    }

    /// Returns the full record for an object, from cache when fresh
    ///
    /// On a miss the record is fetched from the API and cached with the
    /// artwork category TTL before being returned. Fetch failures propagate
    /// unchanged and cache nothing, so the next call retries the network.
    pub async fn artwork_details(&self, object_id: u32) -> Result<Artwork, ArtworkServiceError> {
        if object_id == 0 {
            return Err(ArtworkServiceError::InvalidId(object_id));
        }

        if let Some(artwork) = self.store.get_artwork(object_id) {
            debug!(object_id, "artwork served from cache");
            return Ok(artwork);
        }

        let artwork = self.client.fetch_object(object_id).await?;
        self.store.put_artwork(artwork.clone());
        Ok(artwork)
    }
}
