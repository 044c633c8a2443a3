/// Host page model: video page detection and the read-only page inspector
///
/// The inspector trait is the seam between the extraction pipeline and
/// whatever is actually hosting the page (a fetched document in the CLI,
/// fixtures in tests). The only write it permits is activating a native
/// text track's display mode.
pub mod http;

pub use http::HttpPageInspector;

use async_trait::async_trait;
use url::Url;

/// Hostnames recognized as YouTube
const YOUTUBE_HOSTS: [&str; 3] = ["youtube.com", "www.youtube.com", "m.youtube.com"];

/// Identity of the page currently being watched
///
/// Exactly one context is live per tab; it is rebuilt on every navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoContext {
    pub video_id: Option<String>,
    pub is_video_page: bool,
}

impl VideoContext {
    /// Build a context from a page URL
    pub fn from_url(url: &str) -> Self {
        if is_video_page(url) {
            Self {
                video_id: extract_video_id(url),
                is_video_page: true,
            }
        } else {
            Self::none()
        }
    }

    /// Context for a page that is not a recognized video page
    pub fn none() -> Self {
        Self {
            video_id: None,
            is_video_page: false,
        }
    }
}

/// Check whether a URL points at a YouTube watch page
///
/// Requires a youtube.com host, a `/watch` path and a `v` query parameter.
pub fn is_video_page(url: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    let is_youtube_host = parsed
        .host_str()
        .map_or(false, |host| YOUTUBE_HOSTS.contains(&host));
    let is_watch_path = parsed.path() == "/watch";
    let has_video_param = parsed.query_pairs().any(|(key, _)| key == "v");

    is_youtube_host && is_watch_path && has_video_param
}

/// Extract the `v` query parameter from a watch URL
pub fn extract_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
}

/// Display mode of a native text track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackMode {
    Showing,
    Hidden,
    Disabled,
}

/// A native text track exposed by the page's media element
#[derive(Debug, Clone)]
pub struct TextTrack {
    pub label: String,
    pub language: Option<String>,
    pub mode: TrackMode,
}

/// One timed cue read directly from a native text track
#[derive(Debug, Clone)]
pub struct NativeCue {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

/// Read-only view of the host page used by the caption resolver
#[async_trait]
pub trait PageInspector: Send + Sync {
    /// Page-global player configuration object, if directly accessible
    async fn player_config(&self) -> Option<serde_json::Value>;

    /// Raw markup of the current document
    async fn raw_markup(&self) -> String;

    /// Title of the current video, if one can be determined
    async fn video_title(&self) -> Option<String>;

    /// Native text tracks exposed by the media element
    async fn text_tracks(&self) -> Vec<TextTrack>;

    /// Force a text track's display mode to showing
    async fn activate_track(&self, index: usize);

    /// Cues currently populated on a text track
    async fn track_cues(&self, index: usize) -> Vec<NativeCue>;
}
