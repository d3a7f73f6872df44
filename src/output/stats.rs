//! Statistics over a harvested catalog
//!
//! This module provides functionality for summarizing a catalog file:
//! totals, date range, missing fields and the most used tags.

use crate::catalog::Article;
use std::collections::HashMap;

/// Catalog statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStatistics {
    /// Number of articles
    pub total_articles: usize,

    /// Newest non-empty date
    pub newest_date: Option<String>,

    /// Oldest non-empty date
    pub oldest_date: Option<String>,

    /// Articles with an empty date
    pub missing_dates: usize,

    /// Articles with an empty title
    pub missing_titles: usize,

    /// Articles with an empty description
    pub missing_descriptions: usize,

    /// Articles already marked as processed downstream
    pub processed: usize,

    /// Tags by number of occurrences, most used first (ties by name)
    pub tag_counts: Vec<(String, usize)>,
}

/// Computes statistics for a list of articles
pub fn compute_statistics(articles: &[Article]) -> CatalogStatistics {
    let dated: Vec<&str> = articles
        .iter()
        .map(|a| a.date.as_str())
        .filter(|d| !d.is_empty())
        .collect();

    let mut tags: HashMap<&str, usize> = HashMap::new();
    for tag in articles.iter().flat_map(|a| a.tags.iter()) {
        *tags.entry(tag.as_str()).or_insert(0) += 1;
    }
    let mut tag_counts: Vec<(String, usize)> = tags
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    tag_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    CatalogStatistics {
        total_articles: articles.len(),
        newest_date: dated.iter().max().map(|d| d.to_string()),
        oldest_date: dated.iter().min().map(|d| d.to_string()),
        missing_dates: articles.len() - dated.len(),
        missing_titles: articles.iter().filter(|a| a.title.is_empty()).count(),
        missing_descriptions: articles.iter().filter(|a| a.description.is_empty()).count(),
        processed: articles.iter().filter(|a| a.processed).count(),
        tag_counts,
    }
}

/// Prints statistics to stdout
///
/// # Arguments
///
/// * `stats` - The statistics to print
/// * `top_tags` - How many of the most used tags to list
pub fn print_statistics(stats: &CatalogStatistics, top_tags: usize) {
    println!("=== Catalog Statistics ===\n");

    println!("Articles: {}", stats.total_articles);
    println!(
        "  Newest: {}",
        stats.newest_date.as_deref().unwrap_or("(none)")
    );
    println!(
        "  Oldest: {}",
        stats.oldest_date.as_deref().unwrap_or("(none)")
    );
    println!("  Processed: {}", stats.processed);

    println!("\nMissing Fields:");
    println!("  Date: {}", stats.missing_dates);
    println!("  Title: {}", stats.missing_titles);
    println!("  Description: {}", stats.missing_descriptions);

    println!("\nTop Tags ({} distinct):", stats.tag_counts.len());
    for (tag, count) in stats.tag_counts.iter().take(top_tags) {
        println!("  {:<30} {}", tag, count);
    }
}
