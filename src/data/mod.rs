//! Core data models for the Met collection browser
//!
//! This module contains the data types used throughout the application for
//! representing artworks, artists, and museum departments, plus the API
//! client and the supported-nationality table.

pub mod met;
pub mod nationalities;

pub use met::{MetApiError, MetClient};
pub use nationalities::{all_nationalities, canonical_nationality};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A museum department (e.g. "European Paintings")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Numeric department id used by the collection API
    pub id: u32,
    /// Human-readable department name
    pub name: String,
}

/// The creator of an artwork
///
/// Every field except the name is optional; the collection API frequently
/// returns blank artist metadata, which is mapped to `None` rather than
/// empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// Display name, or "Unknown artist" when the API leaves it blank
    pub name: String,
    /// Nationality as reported by the API
    pub nationality: Option<String>,
    /// Birth year as a display string (the API mixes formats)
    pub birth_year: Option<String>,
    /// Death year as a display string
    pub death_year: Option<String>,
}

impl Artist {
    /// Formats the artist's life period, e.g. "1853–1890" or "1853–"
    ///
    /// Returns an empty string when neither year is known.
    pub fn life_period(&self) -> String {
        match (&self.birth_year, &self.death_year) {
            (Some(birth), Some(death)) => format!("{birth}–{death}"),
            (Some(birth), None) => format!("{birth}–"),
            (None, Some(death)) => format!("–{death}"),
            (None, None) => String::new(),
        }
    }
}

/// A single artwork record from the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    /// Unique object id in the collection API
    pub id: u32,
    /// Artwork title
    pub title: String,
    /// Creator of the artwork
    pub artist: Artist,
    /// Classification (e.g. "Paintings"), if reported
    pub classification: Option<String>,
    /// Creation date as a display string (e.g. "ca. 1660")
    pub date: Option<String>,
    /// Department the artwork belongs to, if reported
    pub department: Option<String>,
    /// URL of the primary image, if one exists
    pub image_url: Option<String>,
    /// When this record was fetched from the API
    pub fetched_at: DateTime<Utc>,
}

impl Artwork {
    /// One-line summary for list views: "Title — Artist (date)"
    pub fn summary(&self) -> String {
        match &self.date {
            Some(date) => format!("{} — {} ({})", self.title, self.artist.name, date),
            None => format!("{} — {}", self.title, self.artist.name),
        }
    }

    /// Whether the artwork has a primary image URL
    pub fn has_image(&self) -> bool {
        self.image_url
            .as_ref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(birth: Option<&str>, death: Option<&str>) -> Artist {
        Artist {
            name: "Vincent van Gogh".to_string(),
            nationality: Some("Dutch".to_string()),
            birth_year: birth.map(String::from),
            death_year: death.map(String::from),
        }
    }

    #[test]
    fn test_life_period_both_years() {
        assert_eq!(artist(Some("1853"), Some("1890")).life_period(), "1853–1890");
    }

    #[test]
    fn test_life_period_birth_only() {
        assert_eq!(artist(Some("1853"), None).life_period(), "1853–");
    }

    #[test]
    fn test_life_period_unknown() {
        assert_eq!(artist(None, None).life_period(), "");
    }

    #[test]
    fn test_artwork_summary_with_date() {
        let artwork = Artwork {
            id: 436535,
            title: "Wheat Field with Cypresses".to_string(),
            artist: artist(Some("1853"), Some("1890")),
            classification: Some("Paintings".to_string()),
            date: Some("1889".to_string()),
            department: Some("European Paintings".to_string()),
            image_url: None,
            fetched_at: Utc::now(),
        };

        assert_eq!(
            artwork.summary(),
            "Wheat Field with Cypresses — Vincent van Gogh (1889)"
        );
    }

    #[test]
    fn test_artwork_summary_without_date() {
        let artwork = Artwork {
            id: 1,
            title: "Untitled".to_string(),
            artist: artist(None, None),
            classification: None,
            date: None,
            department: None,
            image_url: None,
            fetched_at: Utc::now(),
        };

        assert_eq!(artwork.summary(), "Untitled — Vincent van Gogh");
    }

    #[test]
    fn test_has_image_ignores_blank_urls() {
        let mut artwork = Artwork {
            id: 1,
            title: "Untitled".to_string(),
            artist: artist(None, None),
            classification: None,
            date: None,
            department: None,
            image_url: Some("  ".to_string()),
            fetched_at: Utc::now(),
        };
        assert!(!artwork.has_image());

        artwork.image_url = Some("https://images.metmuseum.org/1.jpg".to_string());
        assert!(artwork.has_image());

        artwork.image_url = None;
        assert!(!artwork.has_image());
    }

    #[test]
    fn test_department_serialization_roundtrip() {
        let department = Department {
            id: 11,
            name: "European Paintings".to_string(),
        };

        let json = serde_json::to_string(&department).expect("Failed to serialize Department");
        let deserialized: Department =
            serde_json::from_str(&json).expect("Failed to deserialize Department");

        assert_eq!(deserialized, department);
    }

    #[test]
    fn test_artwork_serialization_roundtrip() {
        let artwork = Artwork {
            id: 45734,
            title: "Quail and Millet".to_string(),
            artist: artist(Some("1847"), None),
            classification: Some("Paintings".to_string()),
            date: Some("1890".to_string()),
            department: Some("Asian Art".to_string()),
            image_url: Some("https://images.metmuseum.org/45734.jpg".to_string()),
            fetched_at: Utc::now(),
        };

        let json = serde_json::to_string(&artwork).expect("Failed to serialize Artwork");
        let deserialized: Artwork =
            serde_json::from_str(&json).expect("Failed to deserialize Artwork");

        assert_eq!(deserialized.id, artwork.id);
        assert_eq!(deserialized.title, artwork.title);
        assert_eq!(deserialized.artist, artwork.artist);
    }
}
