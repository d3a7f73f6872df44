//! Scroll-Harvest: an infinite-scroll blog catalog harvester
//!
//! This crate walks a blog's AJAX "infinite scroll" endpoint page by page,
//! extracts article metadata from each returned HTML fragment, and keeps a
//! deduplicated, date-sorted catalog on disk that is rewritten after every page.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Scroll-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Gave up on page {page} after {attempts} malformed responses")]
    RetriesExhausted { page: u32, attempts: u32 },

    #[error("Invalid cursor date '{value}': {message}")]
    InvalidCursor { value: String, message: String },

    #[error("Last article on page {page} has no entry date")]
    MissingEntryDate { page: u32 },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Scroll-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{Article, Catalog};
pub use config::Config;
pub use crawler::{HarvestReport, Harvester};
pub use state::{Cursor, HarvestState, TerminationReason};
