//! Shop configuration loading from config.toml
//!
//! This module loads the business details used in generated messages, dashboard
//! settings, and the optional sample catalog that is seeded into an empty database.

use crate::core::dashboard::TrendBucketing;
use crate::entities::QuoteStatus;
use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Business identity used in client-facing text
    #[serde(default)]
    pub business: BusinessConfig,
    /// Dashboard behavior
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Categories to seed
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
    /// Products to seed, each naming its category
    #[serde(default)]
    pub products: Vec<ProductSeed>,
    /// Clients to seed
    #[serde(default)]
    pub clients: Vec<ClientSeed>,
    /// Quote requests to seed when none exist yet
    #[serde(default)]
    pub quotes: Vec<QuoteSeed>,
}

/// Business contact details
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessConfig {
    /// Business name used to sign follow-up messages
    pub name: String,
    /// Public phone number
    pub phone: String,
    /// Public email address
    pub email: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: "Tecky Collections".to_string(),
            phone: "0723835202".to_string(),
            email: "teckycollections@gmail.com".to_string(),
        }
    }
}

/// Dashboard settings
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DashboardConfig {
    /// How monthly trend buckets are laid out
    #[serde(default)]
    pub trend_bucketing: TrendBucketing,
}

/// A category to seed
#[derive(Debug, Clone, Deserialize)]
pub struct CategorySeed {
    /// Category name; the slug is derived from it
    pub name: String,
    /// Category description
    #[serde(default)]
    pub description: String,
}

/// A product to seed
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSeed {
    /// Product name; the slug is derived from it
    pub name: String,
    /// Name of an existing or seeded category
    pub category: String,
    /// Product description
    #[serde(default)]
    pub description: String,
    /// How many days before seeding the piece was completed
    #[serde(default)]
    pub completed_days_ago: i64,
    /// Whether the product is featured
    #[serde(default)]
    pub is_featured: bool,
    /// Optional main image reference
    #[serde(default)]
    pub image: Option<String>,
}

/// A client to seed
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSeed {
    /// Client name
    pub full_name: String,
    /// Phone number (identity)
    pub phone_number: String,
    /// Optional email
    #[serde(default)]
    pub email: Option<String>,
}

/// A quote request to seed
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSeed {
    /// Phone number of a seeded client
    pub client_phone: String,
    /// Product name for an existing-product quote
    #[serde(default)]
    pub product: Option<String>,
    /// Project description for a custom quote
    #[serde(default)]
    pub custom_description: Option<String>,
    /// Fabric preference
    pub fabric_preference: String,
    /// Status to leave the quote in
    #[serde(default = "default_seed_status")]
    pub status: QuoteStatus,
    /// Client notes
    #[serde(default)]
    pub additional_notes: String,
    /// Body measurements
    pub measurements: MeasurementSeed,
}

/// Measurements attached to a seeded quote
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementSeed {
    /// Chest in inches
    pub chest: Decimal,
    /// Waist in inches
    pub waist: Decimal,
    /// Hips in inches
    pub hips: Decimal,
    /// Shoulder in inches
    pub shoulder: Decimal,
    /// Sleeve length in inches
    pub sleeve_length: Decimal,
    /// Full length in inches
    pub full_length: Decimal,
    /// Measurement notes
    #[serde(default)]
    pub additional_notes: String,
}

const fn default_seed_status() -> QuoteStatus {
    QuoteStatus::Pending
}

/// Loads shop configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    debug!("Loading shop configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses shop configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from `SHOP_CONFIG` (default `./config.toml`).
///
/// A missing file is not an error: the defaults are used and nothing is seeded.
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var("SHOP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        warn!("No configuration file at {}, using defaults", path);
        return Ok(Config::default());
    }
    load_config(path)
}
