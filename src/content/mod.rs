//! Article records and decoding of the fetched article document.

use serde::Deserialize;

pub mod loader;

pub use loader::{fetch_articles, ArticleLoader};

/// One article from `articles.json`. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Article {
    pub title: String,
    pub date: String,
    pub content: String,
}

/// Error during article loading.
#[derive(Debug)]
pub struct LoadError {
    pub message: String,
    pub phase: &'static str,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.phase, self.message)
    }
}

/// Decode the article document. All-or-nothing: a malformed document
/// yields an error and therefore an empty title pool.
pub fn parse_articles(json: &str) -> Result<Vec<Article>, LoadError> {
    serde_json::from_str(json).map_err(|e| LoadError {
        message: format!("invalid article document: {}", e),
        phase: "decode",
    })
}

/// Title pool in fetch order.
pub fn titles(articles: &[Article]) -> Vec<String> {
    articles.iter().map(|a| a.title.clone()).collect()
}
