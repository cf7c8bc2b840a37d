//! Command-line interface parsing for the Met collection browser
//!
//! This module handles parsing of CLI arguments using clap, including the
//! --artist flag for opening directly into artist search results and the
//! --cache-capacity flag for sizing the shared cache.

use clap::Parser;
use thiserror::Error;

use crate::cache::DEFAULT_CAPACITY;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The artist name was empty after trimming
    #[error("Artist name must not be empty")]
    EmptyArtist,

    /// The cache capacity was zero
    #[error("Cache capacity must be at least 1 entry")]
    InvalidCacheCapacity,
}

/// Met collection browser - browse departments, search artists, view artwork details
#[derive(Parser, Debug)]
#[command(name = "metbrowse")]
#[command(about = "Browse the Metropolitan Museum of Art collection from the terminal")]
#[command(version)]
pub struct Cli {
    /// Open directly into artist search results
    ///
    /// Examples:
    ///   metbrowse --artist "van gogh"    # Open with a Van Gogh search
    ///   metbrowse --artist vermeer       # Open with a Vermeer search
    #[arg(long, value_name = "NAME")]
    pub artist: Option<String>,

    /// Maximum number of entries the shared cache may hold
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CAPACITY)]
    pub cache_capacity: usize,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Artist search to run once data loading finishes (if specified)
    pub initial_artist: Option<String>,
    /// Entry ceiling for the shared cache
    pub cache_capacity: usize,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            initial_artist: None,
            cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the artist name is blank or the capacity is zero
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_artist = match &cli.artist {
            None => None,
            Some(name) => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(CliError::EmptyArtist);
                }
                Some(trimmed.to_string())
            }
        };

        if cli.cache_capacity == 0 {
            return Err(CliError::InvalidCacheCapacity);
        }

        Ok(Self {
            initial_artist,
            cache_capacity: cli.cache_capacity,
        })
    }
}
