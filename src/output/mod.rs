//! Output module for reporting on a persisted catalog
//!
//! This module handles:
//! - Loading a catalog file written by a previous run
//! - Computing and printing catalog statistics
//! - Rendering a markdown index of the catalog

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_index, generate_markdown_index};
pub use stats::{compute_statistics, print_statistics, CatalogStatistics};

use crate::catalog::Article;
use crate::HarvestError;
use std::path::Path;

/// Reads a catalog file as written by `Catalog::persist`
///
/// # Arguments
///
/// * `path` - Path to the JSON catalog
///
/// # Returns
///
/// * `Ok(Vec<Article>)` - Articles in file order (date descending)
/// * `Err(HarvestError)` - The file could not be read or decoded
pub fn load_catalog(path: &Path) -> Result<Vec<Article>, HarvestError> {
    let content = std::fs::read_to_string(path).map_err(|source| HarvestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
