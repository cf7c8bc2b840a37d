//! Metropolitan Museum of Art collection API client
//!
//! This module provides functionality to fetch departments, object details,
//! and search results from the Met collection API and parse them into our
//! data structures. Transient connection failures are retried a bounded
//! number of times with a linear backoff; HTTP error statuses are mapped to
//! typed errors so callers can distinguish not-found from rate limiting.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::{Artist, Artwork, Department};

/// Base URL for the Met collection API
const MET_BASE_URL: &str = "https://collectionapi.metmuseum.org/public/collection/v1";

/// User agent sent with every request
const USER_AGENT: &str = "metbrowse/0.1";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Total attempts for requests that fail with connect/timeout errors
const MAX_ATTEMPTS: u32 = 3;

/// Base delay between retries; grows linearly with the attempt number
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Errors that can occur when talking to the collection API
#[derive(Debug, Error)]
pub enum MetApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The requested resource does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The API rejected the request due to rate limiting
    #[error("API rate limit exceeded, try again later")]
    RateLimited,

    /// The API returned a server-side error status
    #[error("API server error: HTTP {0}")]
    ServerError(u16),

    /// The response was missing required fields or inconsistent
    #[error("Incomplete data in API response: {0}")]
    IncompleteData(String),
}

/// Response from the `/departments` endpoint
#[derive(Debug, Deserialize)]
struct DepartmentsResponse {
    departments: Vec<DepartmentRecord>,
}

/// A single department record from the API
#[derive(Debug, Deserialize)]
struct DepartmentRecord {
    #[serde(rename = "departmentId")]
    department_id: Option<u32>,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

/// Response from the `/search` and `/objects` listing endpoints
///
/// When there are no results the API returns `{"total": 0, "objectIDs": null}`.
#[derive(Debug, Deserialize)]
struct ObjectIdsResponse {
    #[serde(default)]
    total: u64,
    #[serde(rename = "objectIDs")]
    object_ids: Option<Vec<i64>>,
}

/// A single object record from the `/objects/{id}` endpoint
#[derive(Debug, Deserialize)]
struct ObjectRecord {
    #[serde(rename = "objectID")]
    object_id: Option<u32>,
    title: Option<String>,
    #[serde(rename = "artistDisplayName")]
    artist_display_name: Option<String>,
    #[serde(rename = "artistNationality")]
    artist_nationality: Option<String>,
    #[serde(rename = "artistBeginDate")]
    artist_begin_date: Option<String>,
    #[serde(rename = "artistEndDate")]
    artist_end_date: Option<String>,
    classification: Option<String>,
    #[serde(rename = "objectDate")]
    object_date: Option<String>,
    department: Option<String>,
    #[serde(rename = "primaryImageSmall")]
    primary_image_small: Option<String>,
    #[serde(rename = "primaryImage")]
    primary_image: Option<String>,
}

/// Client for the Met collection API
#[derive(Debug, Clone)]
pub struct MetClient {
    client: Client,
    base_url: String,
}

impl Default for MetClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MetClient {
    /// Creates a client pointed at the public collection API
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: MET_BASE_URL.to_string(),
        }
    }

    /// Creates a client with a custom base URL (for testing)
    #[allow(dead_code)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetches the full department list
    ///
    /// Records missing an id or a display name are skipped rather than
    /// failing the whole list.
    pub async fn fetch_departments(&self) -> Result<Vec<Department>, MetApiError> {
        let url = format!("{}/departments", self.base_url);
        let response: DepartmentsResponse = self.get_json(&url).await?;

        let departments: Vec<Department> = response
            .departments
            .into_iter()
            .filter_map(|record| {
                Some(Department {
                    id: record.department_id?,
                    name: record.display_name?,
                })
            })
            .collect();

        if departments.is_empty() {
            return Err(MetApiError::IncompleteData(
                "department list response contained no usable records".to_string(),
            ));
        }

        debug!(count = departments.len(), "fetched department list");
        Ok(departments)
    }

    /// Fetches the detail record for a single object
    ///
    /// # Arguments
    /// * `object_id` - The collection object id to fetch
    ///
    /// # Returns
    /// * `Err(MetApiError::NotFound)` if the object does not exist
    /// * `Err(MetApiError::IncompleteData)` if required fields are missing
    ///   or the returned id does not match the requested one
    pub async fn fetch_object(&self, object_id: u32) -> Result<Artwork, MetApiError> {
        let url = format!("{}/objects/{}", self.base_url, object_id);
        let record: ObjectRecord = self.get_json(&url).await?;
        artwork_from_record(object_id, record)
    }

    /// Searches the collection for objects matching a free-text query
    ///
    /// # Arguments
    /// * `query` - Search term; an empty or whitespace-only query returns an
    ///   empty result without a network call
    /// * `department_id` - Optional department filter
    ///
    /// # Returns
    /// The matching object ids, filtered to positive integers
    pub async fn search_objects(
        &self,
        query: &str,
        department_id: Option<u32>,
    ) -> Result<Vec<u32>, MetApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = format!("{}/search?q={}", self.base_url, urlencode(query));
        if let Some(id) = department_id {
            url.push_str(&format!("&departmentId={id}"));
        }

        let response: ObjectIdsResponse = self.get_json(&url).await?;
        Ok(valid_object_ids(response))
    }

    /// Fetches all object ids belonging to a department
    pub async fn fetch_department_object_ids(
        &self,
        department_id: u32,
    ) -> Result<Vec<u32>, MetApiError> {
        let url = format!("{}/objects?departmentIds={}", self.base_url, department_id);
        let response: ObjectIdsResponse = self.get_json(&url).await?;
        Ok(valid_object_ids(response))
    }

    /// Performs a GET request with retry on transient failures and maps
    /// HTTP error statuses to typed errors
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, MetApiError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = self
                .client
                .get(url)
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .timeout(REQUEST_TIMEOUT)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::NOT_FOUND {
                        return Err(MetApiError::NotFound(url.to_string()));
                    }
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        return Err(MetApiError::RateLimited);
                    }
                    if status.is_server_error() {
                        return Err(MetApiError::ServerError(status.as_u16()));
                    }
                    let response = response.error_for_status()?;
                    let text = response.text().await?;
                    return Ok(serde_json::from_str(&text)?);
                }
                Err(err) if (err.is_connect() || err.is_timeout()) && attempt < MAX_ATTEMPTS => {
                    warn!(attempt, %err, "transient API failure, retrying");
                    tokio::time::sleep(RETRY_DELAY * attempt).await;
                }
                Err(err) => return Err(MetApiError::RequestFailed(err)),
            }
        }
    }
}

/// Converts an object record into an `Artwork`, validating required fields
fn artwork_from_record(requested_id: u32, record: ObjectRecord) -> Result<Artwork, MetApiError> {
    let object_id = record.object_id.ok_or_else(|| {
        MetApiError::IncompleteData(format!("object {requested_id} response is missing objectID"))
    })?;
    if object_id != requested_id {
        return Err(MetApiError::IncompleteData(format!(
            "object id mismatch: requested {requested_id}, received {object_id}"
        )));
    }

    let title = non_empty(record.title).ok_or_else(|| {
        MetApiError::IncompleteData(format!("object {requested_id} response is missing a title"))
    })?;

    let artist = Artist {
        name: non_empty(record.artist_display_name)
            .unwrap_or_else(|| "Unknown artist".to_string()),
        nationality: non_empty(record.artist_nationality),
        birth_year: non_empty(record.artist_begin_date),
        death_year: non_empty(record.artist_end_date),
    };

    // Prefer the small rendition; fall back to the full-size image
    let image_url = non_empty(record.primary_image_small).or(non_empty(record.primary_image));

    Ok(Artwork {
        id: object_id,
        title,
        artist,
        classification: non_empty(record.classification),
        date: non_empty(record.object_date),
        department: non_empty(record.department),
        image_url,
        fetched_at: Utc::now(),
    })
}

/// Extracts the positive object ids from a listing response
fn valid_object_ids(response: ObjectIdsResponse) -> Vec<u32> {
    if response.total == 0 {
        return Vec::new();
    }
    response
        .object_ids
        .unwrap_or_default()
        .into_iter()
        .filter(|id| *id > 0)
        .filter_map(|id| u32::try_from(id).ok())
        .collect()
}

/// Maps empty or whitespace-only strings to `None`
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Minimal percent-encoding for query strings
fn urlencode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
