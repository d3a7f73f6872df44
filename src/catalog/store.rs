//! Deduplicated article catalog with whole-file persistence

use crate::catalog::Article;
use crate::HarvestError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The accumulated, deduplicated set of harvested articles
///
/// Articles are keyed by url and the first occurrence always wins. The
/// catalog is written as a whole after every page, so the file on disk is a
/// complete snapshot at every point of the run.
#[derive(Debug)]
pub struct Catalog {
    /// Articles in insertion order
    articles: Vec<Article>,

    /// url -> position in `articles`
    index: HashMap<String, usize>,

    /// Destination of `persist`
    path: PathBuf,

    /// Number of successful `persist` calls
    persist_count: usize,
}

impl Catalog {
    /// Creates an empty catalog persisted at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            articles: Vec::new(),
            index: HashMap::new(),
            path: path.into(),
            persist_count: 0,
        }
    }

    /// Inserts every article whose url is not already present
    ///
    /// # Returns
    ///
    /// The number of newly inserted articles
    pub fn merge<I>(&mut self, articles: I) -> usize
    where
        I: IntoIterator<Item = Article>,
    {
        let mut inserted = 0;
        for article in articles {
            if self.contains(&article.url) {
                tracing::trace!("Skipping duplicate article {}", article.url);
                continue;
            }
            self.index.insert(article.url.clone(), self.articles.len());
            self.articles.push(article);
            inserted += 1;
        }
        inserted
    }

    /// All articles sorted by `date` descending
    ///
    /// Dates are compared as raw strings. Equal dates keep insertion order.
    pub fn snapshot(&self) -> Vec<Article> {
        let mut sorted = self.articles.clone();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    /// Writes the current snapshot as pretty-printed JSON, replacing the previous file
    ///
    /// The snapshot goes to a sibling temporary file which is then renamed over
    /// the destination, so readers never observe a partially written catalog.
    pub fn persist(&mut self) -> Result<(), HarvestError> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, json).map_err(|e| self.io_error(e))?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.io_error(e));
        }

        self.persist_count += 1;
        tracing::debug!(
            "Persisted {} articles to {}",
            self.articles.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Returns true if an article with this url has been merged
    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    /// Looks up an article by url
    pub fn get(&self, url: &str) -> Option<&Article> {
        self.index.get(url).map(|&i| &self.articles[i])
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Destination of `persist`
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of successful `persist` calls so far
    pub fn persist_count(&self) -> usize {
        self.persist_count
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> HarvestError {
        HarvestError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}
