//! Catalog module for harvested articles
//!
//! This module holds the article record and the deduplicated catalog that is
//! persisted after every processed page.

mod article;
mod store;

pub use article::Article;
pub use store::Catalog;
