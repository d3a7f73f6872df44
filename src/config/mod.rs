//! Configuration module for Scroll-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: `Config::default()` targets the jOOQ blog.
//!
//! # Example
//!
//! ```no_run
//! use scroll_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvest will stop after {} pages", config.harvest.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HarvestConfig, OutputConfig, SourceConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, CURSOR_DATE_FORMAT, DAY_TOKEN_FORMAT};
