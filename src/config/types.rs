use serde::Deserialize;

/// Main configuration structure for Scroll-Harvest
///
/// Every table and key is optional; missing values fall back to the
/// defaults for the jOOQ blog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The infinite-scroll endpoint and the starting cursor
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL the scroll requests are POSTed to
    pub endpoint: String,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Upper-bound date filter, fixed for the whole run (`yyyy-MM-dd HH:mm:ss`)
    #[serde(rename = "query-before")]
    pub query_before: String,

    /// Continuation date for the first page (`yyyy-MM-dd HH:mm:ss`)
    #[serde(rename = "initial-last-date")]
    pub initial_last_date: String,

    /// Day token for the first page (`dd.MM.yy`)
    #[serde(rename = "initial-current-day")]
    pub initial_current_day: String,

    /// Number of posts requested per page
    #[serde(rename = "posts-per-page")]
    pub posts_per_page: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://blog.jooq.org/?infinity=scrolling".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            query_before: "2026-02-20 06:51:59".to_string(),
            initial_last_date: "2026-02-20 06:51:59".to_string(),
            initial_current_day: "20.02.26".to_string(),
            posts_per_page: 10,
        }
    }
}

/// Loop limits and timing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Hard ceiling on the number of pages requested
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Pause between two successful pages (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Backoff unit; the n-th consecutive malformed response waits n units (milliseconds)
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,

    /// Ceiling for a single backoff wait (milliseconds)
    #[serde(rename = "backoff-max-ms")]
    pub backoff_max_ms: u64,

    /// Consecutive malformed responses tolerated for one page, 0 for no limit
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            max_pages: 150,
            page_delay_ms: 1500,
            backoff_base_ms: 3000,
            backoff_max_ms: 60_000,
            max_retries: 20,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the JSON catalog, rewritten after every page
    #[serde(rename = "catalog-path")]
    pub catalog_path: String,

    /// Path to the markdown index written by `--export-summary`
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            catalog_path: "build/jooq_blog_articles.json".to_string(),
            summary_path: "build/jooq_blog_articles.md".to_string(),
        }
    }
}
