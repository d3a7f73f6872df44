//! HTTP fetcher implementation
//!
//! This module handles the scroll requests, including:
//! - Building the form body from the current cursor
//! - Building an HTTP client with a browser-like user agent
//! - The `ScrollTransport` seam the harvester sends requests through
//!
//! The HTTP status is not interpreted: a blocked client gets an
//! HTML page back, which the decoder classifies as malformed.

use crate::config::SourceConfig;
use crate::state::Cursor;
use crate::HarvestError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

/// One scroll request: the endpoint plus its ordered form fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub endpoint: String,
    pub page_index: u32,
    pub fields: Vec<(String, String)>,
}

impl ScrollRequest {
    /// Builds the request for the page the cursor points at
    pub fn from_cursor(cursor: &Cursor, source: &SourceConfig) -> Self {
        let fields = [
            ("action", "infinite_scroll".to_string()),
            ("page", cursor.page_index.to_string()),
            ("currentday", cursor.current_day_token.clone()),
            ("order", "DESC".to_string()),
            ("query_args[posts_per_page]", source.posts_per_page.to_string()),
            ("query_args[order]", "DESC".to_string()),
            ("query_before", source.query_before.clone()),
            ("last_post_date", cursor.last_date.clone()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

        Self {
            endpoint: source.endpoint.clone(),
            page_index: cursor.page_index,
            fields,
        }
    }

    /// Looks up a form field by name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Sends scroll requests and returns the raw response body
///
/// Errors are transport failures only; an unexpected body is still `Ok`.
#[async_trait]
pub trait ScrollTransport: Send + Sync {
    async fn send(&self, request: &ScrollRequest) -> Result<String, HarvestError>;
}

/// `ScrollTransport` over a reqwest client
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the transport with a client configured from `source`
    pub fn from_config(source: &SourceConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(source)?))
    }
}

#[async_trait]
impl ScrollTransport for HttpTransport {
    async fn send(&self, request: &ScrollRequest) -> Result<String, HarvestError> {
        let http_error = |source| HarvestError::Http {
            url: request.endpoint.clone(),
            source,
        };

        let response = self
            .client
            .post(&request.endpoint)
            .form(&request.fields)
            .headers(form_headers())
            .send()
            .await
            .map_err(http_error)?;

        tracing::debug!(
            "Page {}: HTTP {} from {}",
            request.page_index,
            response.status(),
            request.endpoint
        );

        response.text().await.map_err(http_error)
    }
}

/// Content type sent with the form body
///
/// Applied after `RequestBuilder::form`, which would otherwise set the type
/// without a charset.
fn form_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
    );
    headers
}

/// Builds an HTTP client that looks like the blog's own scroll script
///
/// Every request carries a browser-like user agent and the
/// `x-requested-with: XMLHttpRequest` marker.
///
/// # Example
///
/// ```no_run
/// use scroll_harvest::config::SourceConfig;
/// use scroll_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&SourceConfig::default()).unwrap();
/// ```
pub fn build_http_client(source: &SourceConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));

    Client::builder()
        .user_agent(source.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&SourceConfig::default()).is_ok());
    }

    #[test]
    fn test_request_fields_in_order() {
        let source = SourceConfig::default();
        let cursor = Cursor::initial(&source);
        let request = ScrollRequest::from_cursor(&cursor, &source);

        let names: Vec<&str> = request.fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "action",
                "page",
                "currentday",
                "order",
                "query_args[posts_per_page]",
                "query_args[order]",
                "query_before",
                "last_post_date",
            ]
        );
        assert_eq!(request.field("action"), Some("infinite_scroll"));
        assert_eq!(request.field("page"), Some("1"));
        assert_eq!(request.field("currentday"), Some("20.02.26"));
        assert_eq!(request.field("query_args[posts_per_page]"), Some("10"));
        assert_eq!(request.field("last_post_date"), Some("2026-02-20 06:51:59"));
        assert_eq!(request.endpoint, "https://blog.jooq.org/?infinity=scrolling");
    }

    #[test]
    fn test_query_before_stays_fixed() {
        let source = SourceConfig::default();
        let cursor = Cursor::initial(&source)
            .advance("2025-11-02T10:15:00+00:00", "02.11.25")
            .unwrap();
        let request = ScrollRequest::from_cursor(&cursor, &source);

        assert_eq!(request.field("page"), Some("2"));
        assert_eq!(request.field("query_before"), Some("2026-02-20 06:51:59"));
        assert_eq!(request.field("last_post_date"), Some("2025-11-02 10:15:00"));
        assert_eq!(request.field("currentday"), Some("02.11.25"));
    }
}
