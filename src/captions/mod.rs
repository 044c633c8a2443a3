/// Caption track discovery, retrieval and normalization
///
/// Whatever strategy produces the track, the output shape is the same: an
/// ordered list of [`SubtitleCue`] values in source order.
pub mod fetch;
pub mod parser;
pub mod resolver;

pub use fetch::{CaptionFetcher, FetchResponse, HttpCaptionFetcher};
pub use resolver::CaptionResolver;

use serde::{Deserialize, Serialize};

/// One caption entry normalized from any caption source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    /// Start offset in seconds from the beginning of the video
    pub start: f64,
    /// Display duration in seconds
    pub duration: f64,
    /// Cue text, trimmed and never empty
    pub text: String,
}

impl SubtitleCue {
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            duration,
            text: text.into(),
        }
    }
}
