/// Caption track retrieval over HTTP
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Response from a caption track GET
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network fetch capability used for caption track retrieval
///
/// No authentication and no retries; fallback behavior lives in the
/// resolver, not here.
#[async_trait]
pub trait CaptionFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchResponse>;
}

/// Fetcher backed by a shared reqwest client
pub struct HttpCaptionFetcher {
    client: Client,
}

impl HttpCaptionFetcher {
    pub fn new(user_agent: &str, timeout_seconds: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }
}

#[async_trait]
impl CaptionFetcher for HttpCaptionFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse> {
        debug!("Fetching caption track: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(FetchResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Append a machine-readable format request parameter if one is absent
pub fn normalize_caption_url(url: &str) -> String {
    if url.contains("format=") {
        return url.to_string();
    }

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}format=json3", url, separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_param_appended() {
        assert_eq!(
            normalize_caption_url("https://www.youtube.com/api/timedtext?v=abc"),
            "https://www.youtube.com/api/timedtext?v=abc&format=json3"
        );
        assert_eq!(
            normalize_caption_url("https://www.youtube.com/api/timedtext"),
            "https://www.youtube.com/api/timedtext?format=json3"
        );
    }

    #[test]
    fn test_existing_format_param_kept() {
        let url = "https://www.youtube.com/api/timedtext?v=abc&format=srv3";
        assert_eq!(normalize_caption_url(url), url);
    }

    #[test]
    fn test_success_status_range() {
        let ok = FetchResponse {
            status: 200,
            content_type: None,
            body: String::new(),
        };
        let not_found = FetchResponse {
            status: 404,
            content_type: None,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!not_found.is_success());
    }
}
