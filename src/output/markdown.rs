//! Markdown index generation
//!
//! This module renders a harvested catalog as a human-readable markdown
//! index: one entry per article with its date, tags and description.

use crate::catalog::Article;
use crate::HarvestError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown index of `articles` to `output_path`
///
/// # Arguments
///
/// * `articles` - Articles in the order they should be listed
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the index
/// * `Err(HarvestError)` - Failed to write the file
pub fn generate_markdown_index(articles: &[Article], output_path: &Path) -> Result<(), HarvestError> {
    let io_error = |source| HarvestError::Io {
        path: output_path.display().to_string(),
        source,
    };

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let markdown = format_markdown_index(articles);
    let mut file = File::create(output_path).map_err(io_error)?;
    file.write_all(markdown.as_bytes()).map_err(io_error)?;

    Ok(())
}

/// Formats articles as a markdown index
pub fn format_markdown_index(articles: &[Article]) -> String {
    let mut md = String::new();

    md.push_str("# Blog Article Index\n\n");
    md.push_str(&format!("{} articles\n\n", articles.len()));

    for article in articles {
        let title = if article.title.is_empty() {
            article.url.as_str()
        } else {
            article.title.as_str()
        };
        md.push_str(&format!("## [{}]({})\n\n", escape(title), article.url));

        if !article.date.is_empty() {
            // Only the calendar day; the raw timestamp stays in the JSON catalog
            let day = article.date.get(..10).unwrap_or(&article.date);
            md.push_str(&format!("- **Date**: {}\n", day));
        }
        if !article.tags.is_empty() {
            let tags: Vec<String> = article.tags.iter().map(|t| format!("`{}`", t)).collect();
            md.push_str(&format!("- **Tags**: {}\n", tags.join(", ")));
        }
        if !article.description.is_empty() {
            md.push_str(&format!("\n{}\n", article.description));
        }
        md.push('\n');
    }

    md
}

/// Escapes characters that would break a link label
fn escape(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}
