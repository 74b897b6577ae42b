//! Fetching the article document, blocking and in the background.
//!
//! The UI never blocks on the network: `ArticleLoader` spawns one thread
//! for the fetch and is polled every frame until the result arrives.

use std::sync::mpsc;

use eframe::egui;
use url::Url;

use super::{parse_articles, Article, LoadError};

/// Fetch and decode `articles.json` from `url_str` (blocking).
pub fn fetch_articles(url_str: &str) -> Result<Vec<Article>, LoadError> {
    let parsed = Url::parse(url_str).map_err(|e| LoadError {
        message: format!("invalid URL {}: {}", url_str, e),
        phase: "fetch",
    })?;

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("rainpage/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(15))
        .build()
        .map_err(|e| LoadError {
            message: format!("client error: {}", e),
            phase: "fetch",
        })?;

    let response = client
        .get(parsed.as_str())
        .header("Accept", "application/json")
        .send()
        .map_err(|e| LoadError {
            message: format!("request failed: {}", e),
            phase: "fetch",
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError {
            message: format!("HTTP {}", status),
            phase: "fetch",
        });
    }

    let body = response.text().map_err(|e| LoadError {
        message: format!("failed to read body: {}", e),
        phase: "fetch",
    })?;

    parse_articles(&body)
}

/// Background article fetch, polled once per frame.
pub struct ArticleLoader {
    rx: Option<mpsc::Receiver<Result<Vec<Article>, LoadError>>>,
}

impl ArticleLoader {
    pub fn new() -> Self {
        Self { rx: None }
    }

    /// Spawn the fetch thread. A repaint is requested when the result lands.
    pub fn start(&mut self, url: &str, ctx: egui::Context) {
        if self.rx.is_some() {
            return;
        }

        let (tx, rx) = mpsc::channel();
        self.rx = Some(rx);

        let url = url.to_string();
        std::thread::spawn(move || {
            let result = fetch_articles(&url);
            let _ = tx.send(result);
            ctx.request_repaint();
        });
    }

    /// Poll for the fetch result. Returns `Some` exactly once.
    pub fn poll(&mut self) -> Option<Result<Vec<Article>, LoadError>> {
        let result = self.rx.as_ref()?.try_recv().ok()?;
        self.rx = None;
        Some(result)
    }

    pub fn in_flight(&self) -> bool {
        self.rx.is_some()
    }
}

impl Default for ArticleLoader {
    fn default() -> Self {
        Self::new()
    }
}
