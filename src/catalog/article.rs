use serde::{Deserialize, Serialize};

/// One discovered blog post
///
/// Created once during extraction and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Canonical key, trailing `/` stripped
    pub url: String,

    pub title: String,

    /// First body paragraph without the "Continue reading" suffix
    pub description: String,

    /// Raw `datetime` attribute as published, empty when the page had none
    pub date: String,

    /// Category and tag slugs in the order they appear, duplicates kept
    pub tags: Vec<String>,

    /// Reserved for downstream consumers; always `false` here
    #[serde(default)]
    pub processed: bool,
}

impl Article {
    /// Creates an unprocessed article
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            description: description.into(),
            date: date.into(),
            tags,
            processed: false,
        }
    }
}
