/// Page inspector backed by a plain HTTP fetch of the watch page
use super::{NativeCue, PageInspector, TextTrack};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

/// Inspector over a watch page document retrieved with reqwest
///
/// Serves the raw markup for pattern scanning and the document title for
/// filename selection. A fetched document has no live media element, so the
/// native text-track surface is always empty and the player configuration is
/// only reachable through markup recovery.
pub struct HttpPageInspector {
    markup: String,
    title: Option<String>,
}

impl HttpPageInspector {
    /// Fetch a watch page and build an inspector over its markup
    pub async fn fetch(url: &str, user_agent: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|_| Client::new());

        info!("🌐 Fetching watch page: {}", url);
        let response = client.get(url).send().await?;
        let markup = response.text().await?;
        debug!("Fetched {} bytes of markup", markup.len());

        Ok(Self::from_markup(markup))
    }

    /// Build an inspector over an already-retrieved document
    pub fn from_markup(markup: String) -> Self {
        let title = extract_title(&markup);
        Self { markup, title }
    }
}

#[async_trait]
impl PageInspector for HttpPageInspector {
    async fn player_config(&self) -> Option<serde_json::Value> {
        // No script context on a fetched document; the resolver recovers the
        // configuration from the raw markup instead.
        None
    }

    async fn raw_markup(&self) -> String {
        self.markup.clone()
    }

    async fn video_title(&self) -> Option<String> {
        self.title.clone()
    }

    async fn text_tracks(&self) -> Vec<TextTrack> {
        Vec::new()
    }

    async fn activate_track(&self, _index: usize) {}

    async fn track_cues(&self, _index: usize) -> Vec<NativeCue> {
        Vec::new()
    }
}

/// Pull the document title out of the markup, stripping the site suffix
fn extract_title(markup: &str) -> Option<String> {
    let document = Html::parse_document(markup);
    let selector = Selector::parse("title").ok()?;

    let raw: String = document.select(&selector).next()?.text().collect();
    let title = raw.trim().trim_end_matches(" - YouTube").trim().to_string();

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}
