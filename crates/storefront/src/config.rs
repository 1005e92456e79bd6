//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CLICKME_DATA_DIR` - Directory for persisted state (default: .clickme)
//! - `CLICKME_SEARCH_DEBOUNCE_MS` - Search box debounce (default: 300)
//! - `CLICKME_PRICE_DEBOUNCE_MS` - Price filter debounce (default: 500)
//! - `CLICKME_DRAFT_AUTOSAVE_MS` - Contact draft auto-save debounce (default: 1000)
//! - `CLICKME_SUBMIT_DELAY_MS` - Simulated contact submit delay (default: 1500)
//! - `CLICKME_DRAFT_TTL_HOURS` - Contact draft freshness window (default: 24)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;
use thiserror::Error;

const DEFAULT_DATA_DIR: &str = ".clickme";
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
const DEFAULT_PRICE_DEBOUNCE_MS: u64 = 500;
const DEFAULT_DRAFT_AUTOSAVE_MS: u64 = 1000;
const DEFAULT_SUBMIT_DELAY_MS: u64 = 1500;
const DEFAULT_DRAFT_TTL_HOURS: i64 = 24;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory holding the persisted cart, draft and submissions
    pub data_dir: PathBuf,
    /// Debounce timings for user input
    pub debounce: DebounceConfig,
    /// Simulated network delay when submitting the contact form
    pub submit_delay: Duration,
    /// How long a saved contact draft stays fresh
    pub draft_ttl: TimeDelta,
}

/// Debounce windows for interactive inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    pub search: Duration,
    pub price: Duration,
    pub draft_autosave: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            search: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            price: Duration::from_millis(DEFAULT_PRICE_DEBOUNCE_MS),
            draft_autosave: Duration::from_millis(DEFAULT_DRAFT_AUTOSAVE_MS),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            debounce: DebounceConfig::default(),
            submit_delay: Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS),
            draft_ttl: TimeDelta::hours(DEFAULT_DRAFT_TTL_HOURS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = lookup("CLICKME_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let debounce = DebounceConfig {
            search: get_millis(&lookup, "CLICKME_SEARCH_DEBOUNCE_MS", DEFAULT_SEARCH_DEBOUNCE_MS)?,
            price: get_millis(&lookup, "CLICKME_PRICE_DEBOUNCE_MS", DEFAULT_PRICE_DEBOUNCE_MS)?,
            draft_autosave: get_millis(
                &lookup,
                "CLICKME_DRAFT_AUTOSAVE_MS",
                DEFAULT_DRAFT_AUTOSAVE_MS,
            )?,
        };
        let submit_delay =
            get_millis(&lookup, "CLICKME_SUBMIT_DELAY_MS", DEFAULT_SUBMIT_DELAY_MS)?;

        let ttl_hours: i64 =
            get_parsed_or_default(&lookup, "CLICKME_DRAFT_TTL_HOURS", DEFAULT_DRAFT_TTL_HOURS)?;
        if ttl_hours <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CLICKME_DRAFT_TTL_HOURS".to_string(),
                "must be a positive number of hours".to_string(),
            ));
        }
        let draft_ttl = TimeDelta::try_hours(ttl_hours).ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "CLICKME_DRAFT_TTL_HOURS".to_string(),
                "out of range".to_string(),
            )
        })?;

        Ok(Self {
            data_dir,
            debounce,
            submit_delay,
            draft_ttl,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to `default` when it is unset.
fn get_parsed_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

/// Get a millisecond duration with a default value.
fn get_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<Duration, ConfigError> {
    get_parsed_or_default(lookup, key, default).map(Duration::from_millis)
}
