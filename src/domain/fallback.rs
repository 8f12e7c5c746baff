//! Static fallback listings keyed by fundraising id.
//!
//! Property metadata (images, descriptions, amenities) never lives on
//! chain, so every page merges the live record with one of these listings.
//! Listings also carry placeholder funding figures used when the live
//! record is missing or malformed. The store is read-only after startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const EMBEDDED_LISTINGS: &str = include_str!("../../data/listings.json");

/// Failure to load a listings file.
#[derive(Debug, thiserror::Error)]
pub enum FallbackError {
    /// The file could not be read.
    #[error("cannot read fallback listings {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not a JSON array of listings.
    #[error("invalid fallback listings: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two listings share an id.
    #[error("duplicate fallback listing id: {0}")]
    Duplicate(String),
}

/// Placeholder funding figures, in display units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FallbackFunding {
    /// Campaign goal.
    pub goal: f64,
    /// Amount raised.
    pub raised: f64,
    /// Minimum contribution.
    pub min_investment: f64,
    /// Maximum contribution.
    pub max_investment: f64,
    /// Number of distinct investors.
    pub investor_count: usize,
    /// Campaign deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Whether the campaign is shown as completed.
    pub is_completed: bool,
}

/// Off-chain property metadata for one fundraising.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PropertyListing {
    /// Fundraising contract address this listing describes.
    pub id: String,
    /// Display name.
    pub name: String,
    /// City / region.
    pub location: String,
    /// Hero image URL.
    pub image_url: String,
    /// Marketing description.
    pub description: String,
    /// Amenity list.
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Residential, commercial, ...
    pub property_type: String,
    /// Floor area in square feet.
    #[serde(default)]
    pub area_sqft: u32,
    /// Projected annual yield, in percent.
    #[serde(default)]
    pub expected_yield_percent: f64,
    /// Token symbol shown before the token is indexed.
    #[serde(default)]
    pub token_symbol: String,
    /// Placeholder funding figures.
    #[serde(default)]
    pub funding: FallbackFunding,
}

/// In-process table of [`PropertyListing`]s.
///
/// Lookups are case-insensitive on the id, since the same contract address
/// may be written checksummed or lowercase.
#[derive(Debug, Clone, Default)]
pub struct FallbackStore {
    listings: HashMap<String, PropertyListing>,
    order: Vec<String>,
}

impl FallbackStore {
    /// Builds a store from listings, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::Duplicate`] when two listings share an id.
    pub fn from_listings(listings: Vec<PropertyListing>) -> Result<Self, FallbackError> {
        let mut store = Self::default();
        for listing in listings {
            let key = listing.id.to_ascii_lowercase();
            if store.listings.contains_key(&key) {
                return Err(FallbackError::Duplicate(listing.id));
            }
            store.order.push(key.clone());
            store.listings.insert(key, listing);
        }
        Ok(store)
    }

    /// Parses a JSON array of listings.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::Parse`] on invalid JSON and
    /// [`FallbackError::Duplicate`] on repeated ids.
    pub fn from_json(json: &str) -> Result<Self, FallbackError> {
        let listings: Vec<PropertyListing> = serde_json::from_str(json)?;
        Self::from_listings(listings)
    }

    /// Loads the listings bundled with the binary.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled file is invalid.
    pub fn embedded() -> Result<Self, FallbackError> {
        Self::from_json(EMBEDDED_LISTINGS)
    }

    /// Loads listings from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::Io`] if the file cannot be read, otherwise
    /// the errors of [`Self::from_json`].
    pub fn from_file(path: &Path) -> Result<Self, FallbackError> {
        let json = std::fs::read_to_string(path).map_err(|source| FallbackError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Loads from `path` when given, otherwise the embedded listings.
    ///
    /// # Errors
    ///
    /// See [`Self::from_file`] and [`Self::embedded`].
    pub fn load(path: Option<&Path>) -> Result<Self, FallbackError> {
        let store = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::embedded()?,
        };
        tracing::info!(listings = store.len(), "fallback listings loaded");
        Ok(store)
    }

    /// Looks up the listing for a fundraising id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PropertyListing> {
        self.listings.get(&id.to_ascii_lowercase())
    }

    /// Iterates listings in file order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyListing> {
        self.order.iter().filter_map(|key| self.listings.get(key))
    }

    /// Number of listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// `true` when there are no listings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}
