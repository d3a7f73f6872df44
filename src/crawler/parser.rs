//! HTML parser for extracting articles from a scroll fragment
//!
//! This module turns the `html` field of a decoded page into article records.
//! Each `<article>` block yields at most one record:
//! - url and title from the `h2.entry-title a` link (required)
//! - date from `time.entry-date[datetime]`
//! - description from the first `div.entry-content p`
//! - tags from `category-*` / `tag-*` class names
//!
//! It also finds the continuation date for the next request.

use crate::catalog::Article;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static ARTICLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("article").unwrap());
static TITLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2.entry-title a").unwrap());
static ENTRY_DATE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time.entry-date").unwrap());
static BODY_PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.entry-content p").unwrap());

static CONTINUE_READING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*Continue reading.*$").unwrap());
static TAG_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:category|tag)-([A-Za-z0-9_-]+)").unwrap());

/// First element under `scope` matching `selector`
pub fn query_first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Every element under `scope` matching `selector`, in document order
pub fn query_all<'a>(scope: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    scope.select(selector).collect()
}

/// Extracts one article per `<article>` block, in document order
///
/// Blocks without a title link are skipped. Every other field falls back to
/// an empty value when its element is missing.
///
/// # Example
///
/// ```
/// use scroll_harvest::crawler::parse_articles;
///
/// let html = r#"<article class="post category-sql">
///     <h2 class="entry-title"><a href="https://blog.example.com/post/">Post</a></h2>
/// </article>"#;
/// let articles = parse_articles(html);
/// assert_eq!(articles[0].url, "https://blog.example.com/post");
/// assert_eq!(articles[0].tags, vec!["sql"]);
/// ```
pub fn parse_articles(html: &str) -> Vec<Article> {
    let fragment = Html::parse_fragment(html);
    query_all(fragment.root_element(), &ARTICLE)
        .into_iter()
        .filter_map(extract_article)
        .collect()
}

/// Raw `datetime` of the last article block, used as the next cursor date
///
/// Returns None when the fragment has no article blocks or the last one
/// carries no dated `time.entry-date` element.
pub fn oldest_datetime(html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(html);
    let last = query_all(fragment.root_element(), &ARTICLE).pop()?;
    query_first(last, &ENTRY_DATE)
        .and_then(|time| time.value().attr("datetime"))
        .map(str::to_string)
}

fn extract_article(block: ElementRef<'_>) -> Option<Article> {
    let Some(link) = query_first(block, &TITLE_LINK) else {
        tracing::debug!("Skipping article block without a title link");
        return None;
    };

    let url = link
        .value()
        .attr("href")
        .unwrap_or_default()
        .trim_end_matches('/')
        .to_string();
    let title = visible_text(link);

    let date = query_first(block, &ENTRY_DATE)
        .and_then(|time| time.value().attr("datetime"))
        .unwrap_or_default()
        .to_string();

    let description = query_first(block, &BODY_PARAGRAPH)
        .map(|p| strip_continue_reading(&visible_text(p)))
        .unwrap_or_default();

    let tags = extract_tags(block.value().attr("class").unwrap_or_default());

    Some(Article::new(url, title, description, date, tags))
}

/// Element text with whitespace runs collapsed, as a browser renders it
fn visible_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_continue_reading(text: &str) -> String {
    CONTINUE_READING.replace(text, "").trim().to_string()
}

fn extract_tags(classes: &str) -> Vec<String> {
    TAG_CLASS
        .captures_iter(classes)
        .map(|caps| caps[1].to_string())
        .collect()
}
