/// Multi-strategy caption source resolution
///
/// Strategies run in fixed priority order and the first one to locate a
/// track wins. Failing to locate a track moves on to the next strategy; a
/// located track that cannot be fetched or parsed is a hard stop, since the
/// problem at that point is the track itself, not its absence.
use super::fetch::{normalize_caption_url, CaptionFetcher};
use super::{parser, SubtitleCue};
use crate::error::{Result, SubtidexError};
use crate::page::{PageInspector, TrackMode};
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Assignment of the player configuration object in page markup
const PLAYER_RESPONSE_PATTERN: &str = r"ytInitialPlayerResponse\s*=\s*(\{.+?\});";

/// Known textual shapes of caption track URLs in page markup, tried in
/// order; later entries cover legacy layouts
const TRACK_URL_PATTERNS: &[&str] = &[
    r#""captionTracks":\[\{"baseUrl":"([^"]+)""#,
    r#"captionTracks':\[\{.*?'baseUrl':\s*'([^']+)'"#,
    r#"timedtext\?.*?":'(https://www\.youtube\.com/api/timedtext[^']+)'"#,
    r#"playerCaptionsTracklistRenderer.*?baseUrl":"([^"]+)""#,
];

/// Resolves a caption cue list from the current page
pub struct CaptionResolver {
    fetcher: Arc<dyn CaptionFetcher>,
    cue_settle_delay: Duration,
}

impl CaptionResolver {
    pub fn new(fetcher: Arc<dyn CaptionFetcher>, cue_settle_delay: Duration) -> Self {
        Self {
            fetcher,
            cue_settle_delay,
        }
    }

    /// Run the strategies in priority order against the given page
    ///
    /// Returns a non-empty cue list in source order, or the typed failure
    /// describing why none could be produced.
    pub async fn resolve(&self, inspector: &dyn PageInspector) -> Result<Vec<SubtitleCue>> {
        if let Some(url) = self.locate_in_player_config(inspector).await {
            debug!("Caption track located in player configuration");
            return self.fetch_and_parse(&url).await;
        }

        if let Some(url) = self.locate_in_markup(inspector).await {
            debug!("Caption track located by markup pattern scan");
            return self.fetch_and_parse(&url).await;
        }

        if let Some(cues) = self.read_native_track(inspector).await {
            info!("📝 Read {} cues from native text track", cues.len());
            return Ok(cues);
        }

        Err(SubtidexError::NoCaptionsAvailable)
    }

    /// Strategy 1: first caption track listed in the player configuration
    ///
    /// Uses the page-global configuration object when the inspector exposes
    /// one, otherwise recovers it from the raw markup. A recovered blob that
    /// fails JSON parsing counts as not found for this strategy.
    async fn locate_in_player_config(&self, inspector: &dyn PageInspector) -> Option<String> {
        let config = match inspector.player_config().await {
            Some(config) => Some(config),
            None => recover_config_from_markup(&inspector.raw_markup().await),
        }?;

        first_caption_url(&config)
    }

    /// Strategy 2: pattern-match a caption track URL out of the raw markup
    async fn locate_in_markup(&self, inspector: &dyn PageInspector) -> Option<String> {
        let markup = inspector.raw_markup().await;

        for pattern in TRACK_URL_PATTERNS {
            if let Ok(re) = Regex::new(pattern) {
                if let Some(captures) = re.captures(&markup) {
                    return Some(captures[1].replace(r"\u0026", "&"));
                }
            }
        }

        None
    }

    /// Strategy 3: read cues off the media element's native text tracks
    ///
    /// Picks the showing track, or the first track if none is showing,
    /// forces it active and waits a settling delay for cue data to populate.
    async fn read_native_track(&self, inspector: &dyn PageInspector) -> Option<Vec<SubtitleCue>> {
        let tracks = inspector.text_tracks().await;
        if tracks.is_empty() {
            return None;
        }

        let index = tracks
            .iter()
            .position(|track| track.mode == TrackMode::Showing)
            .unwrap_or(0);

        inspector.activate_track(index).await;
        sleep(self.cue_settle_delay).await;

        let cues: Vec<SubtitleCue> = inspector
            .track_cues(index)
            .await
            .into_iter()
            .filter_map(|cue| {
                let text = cue.text.trim().to_string();
                if text.is_empty() {
                    return None;
                }
                Some(SubtitleCue::new(
                    cue.start_time,
                    cue.end_time - cue.start_time,
                    text,
                ))
            })
            .collect();

        if cues.is_empty() {
            None
        } else {
            Some(cues)
        }
    }

    /// Retrieve and normalize a located caption track
    async fn fetch_and_parse(&self, url: &str) -> Result<Vec<SubtitleCue>> {
        let url = normalize_caption_url(url);
        let response = self.fetcher.get(&url).await?;

        if !response.is_success() {
            return Err(SubtidexError::FetchFailed(response.status));
        }

        let cues = parser::parse_caption_body(response.content_type.as_deref(), &response.body)?;
        if cues.is_empty() {
            return Err(SubtidexError::NoCaptionsAvailable);
        }

        Ok(cues)
    }
}

/// Recover the player configuration JSON from raw markup
fn recover_config_from_markup(markup: &str) -> Option<serde_json::Value> {
    let re = Regex::new(PLAYER_RESPONSE_PATTERN).ok()?;
    let captures = re.captures(markup)?;

    match serde_json::from_str(&captures[1]) {
        Ok(config) => Some(config),
        Err(_) => {
            debug!("Recovered player response failed JSON parse");
            None
        }
    }
}

/// First listed caption track URL inside a player configuration object
fn first_caption_url(config: &serde_json::Value) -> Option<String> {
    let tracks = config
        .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
        .or_else(|| config.get("captionTracks"))?
        .as_array()?;

    let first = tracks.first()?;
    first
        .get("baseUrl")
        .or_else(|| first.get("url"))?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::fetch::FetchResponse;
    use crate::page::{NativeCue, TextTrack};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SETTLE: Duration = Duration::from_millis(10);

    /// Fixture page with configurable surfaces
    #[derive(Default)]
    struct FixturePage {
        config: Option<serde_json::Value>,
        markup: String,
        tracks: Vec<TextTrack>,
        cues: Vec<NativeCue>,
        activated: AtomicUsize,
    }

    #[async_trait]
    impl PageInspector for FixturePage {
        async fn player_config(&self) -> Option<serde_json::Value> {
            self.config.clone()
        }

        async fn raw_markup(&self) -> String {
            self.markup.clone()
        }

        async fn video_title(&self) -> Option<String> {
            Some("Fixture Video".to_string())
        }

        async fn text_tracks(&self) -> Vec<TextTrack> {
            self.tracks.clone()
        }

        async fn activate_track(&self, _index: usize) {
            self.activated.fetch_add(1, Ordering::SeqCst);
        }

        async fn track_cues(&self, _index: usize) -> Vec<NativeCue> {
            self.cues.clone()
        }
    }

    /// In-memory fetcher mapping URLs to canned responses
    #[derive(Default)]
    struct FixtureFetcher {
        responses: HashMap<String, FetchResponse>,
        requests: AtomicUsize,
    }

    impl FixtureFetcher {
        fn with_response(url: &str, content_type: &str, body: &str) -> Self {
            let mut fetcher = Self::default();
            fetcher.responses.insert(
                url.to_string(),
                FetchResponse {
                    status: 200,
                    content_type: Some(content_type.to_string()),
                    body: body.to_string(),
                },
            );
            fetcher
        }
    }

    #[async_trait]
    impl CaptionFetcher for FixtureFetcher {
        async fn get(&self, url: &str) -> Result<FetchResponse> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .responses
                .get(url)
                .cloned()
                .unwrap_or_else(|| FetchResponse {
                    status: 404,
                    content_type: None,
                    body: String::new(),
                }))
        }
    }

    fn resolver(fetcher: FixtureFetcher) -> CaptionResolver {
        CaptionResolver::new(Arc::new(fetcher), SETTLE)
    }

    const JSON3_BODY: &str =
        r#"{"events": [{"tStartMs": 1000, "dDurationMs": 2000, "segs": [{"utf8": "hello"}]}]}"#;

    #[tokio::test]
    async fn test_strategy1_uses_direct_player_config() {
        let page = FixturePage {
            config: Some(serde_json::json!({
                "captions": {"playerCaptionsTracklistRenderer": {"captionTracks": [
                    {"baseUrl": "https://captions.test/track"}
                ]}}
            })),
            ..Default::default()
        };
        let fetcher = FixtureFetcher::with_response(
            "https://captions.test/track?format=json3",
            "application/json",
            JSON3_BODY,
        );

        let cues = resolver(fetcher).resolve(&page).await.unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start, 1.0);
        assert_eq!(cues[0].text, "hello");
    }

    #[tokio::test]
    async fn test_strategy1_recovers_config_from_markup() {
        let page = FixturePage {
            markup: format!(
                "<script>var ytInitialPlayerResponse = {};</script>",
                r#"{"captions": {"playerCaptionsTracklistRenderer": {"captionTracks": [{"baseUrl": "https://captions.test/embedded"}]}}}"#
            ),
            ..Default::default()
        };
        let fetcher = FixtureFetcher::with_response(
            "https://captions.test/embedded?format=json3",
            "application/json",
            JSON3_BODY,
        );

        let cues = resolver(fetcher).resolve(&page).await.unwrap();
        assert_eq!(cues[0].text, "hello");
    }

    #[tokio::test]
    async fn test_strategy2_pattern_scan_with_escaped_ampersand() {
        let page = FixturePage {
            markup: r#"..."captionTracks":[{"baseUrl":"https://captions.test/scan?v=abc\u0026lang=en"}]..."#
                .to_string(),
            ..Default::default()
        };
        let fetcher = FixtureFetcher::with_response(
            "https://captions.test/scan?v=abc&lang=en&format=json3",
            "application/json",
            JSON3_BODY,
        );

        let cues = resolver(fetcher).resolve(&page).await.unwrap();
        assert_eq!(cues[0].text, "hello");
    }

    #[tokio::test]
    async fn test_strategy2_parse_failure_does_not_reach_strategy3() {
        let page = FixturePage {
            markup: r#""captionTracks":[{"baseUrl":"https://captions.test/broken"}]"#.to_string(),
            tracks: vec![TextTrack {
                label: "English".to_string(),
                language: Some("en".to_string()),
                mode: TrackMode::Showing,
            }],
            cues: vec![NativeCue {
                start_time: 0.0,
                end_time: 1.0,
                text: "native".to_string(),
            }],
            ..Default::default()
        };
        let fetcher = FixtureFetcher::with_response(
            "https://captions.test/broken?format=json3",
            "application/octet-stream",
            "garbage body",
        );

        let result = resolver(fetcher).resolve(&page).await;
        assert!(matches!(result, Err(SubtidexError::ParseFailed)));
        assert_eq!(page.activated.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces_status() {
        let page = FixturePage {
            markup: r#""captionTracks":[{"baseUrl":"https://captions.test/missing"}]"#.to_string(),
            ..Default::default()
        };

        let result = resolver(FixtureFetcher::default()).resolve(&page).await;
        assert!(matches!(result, Err(SubtidexError::FetchFailed(404))));
    }

    #[tokio::test]
    async fn test_strategy3_reads_native_cues() {
        let page = FixturePage {
            tracks: vec![
                TextTrack {
                    label: "English".to_string(),
                    language: Some("en".to_string()),
                    mode: TrackMode::Disabled,
                },
                TextTrack {
                    label: "German".to_string(),
                    language: Some("de".to_string()),
                    mode: TrackMode::Showing,
                },
            ],
            cues: vec![
                NativeCue {
                    start_time: 2.0,
                    end_time: 5.5,
                    text: " native cue ".to_string(),
                },
                NativeCue {
                    start_time: 6.0,
                    end_time: 7.0,
                    text: "   ".to_string(),
                },
            ],
            ..Default::default()
        };

        let cues = resolver(FixtureFetcher::default())
            .resolve(&page)
            .await
            .unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start, 2.0);
        assert_eq!(cues[0].duration, 3.5);
        assert_eq!(cues[0].text, "native cue");
        assert_eq!(page.activated.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_source_yields_no_captions_available() {
        let page = FixturePage::default();
        let result = resolver(FixtureFetcher::default()).resolve(&page).await;
        assert!(matches!(result, Err(SubtidexError::NoCaptionsAvailable)));
    }

    #[test]
    fn test_first_caption_url_legacy_shapes() {
        let config = serde_json::json!({"captionTracks": [{"url": "https://legacy.test/track"}]});
        assert_eq!(
            first_caption_url(&config).as_deref(),
            Some("https://legacy.test/track")
        );

        let config = serde_json::json!({"captions": {}});
        assert_eq!(first_caption_url(&config), None);
    }
}
