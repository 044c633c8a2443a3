use thiserror::Error;

/// Result type for extraction pipeline operations
pub type Result<T> = std::result::Result<T, SubtidexError>;

/// Error taxonomy for the extraction pipeline
///
/// Every extraction-path failure surfaces as one of these variants; the
/// orchestrator converts them to user-facing notifications at its boundary.
#[derive(Error, Debug)]
pub enum SubtidexError {
    #[error("Not a YouTube video page")]
    NotAVideoPage,

    #[error("No subtitles found for this video")]
    NoCaptionsAvailable,

    #[error("Failed to fetch captions: HTTP {0}")]
    FetchFailed(u16),

    #[error("Failed to parse caption track")]
    ParseFailed,

    #[error("No subtitles to convert")]
    EmptyInput,

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Messaging channel unavailable")]
    ChannelUnavailable,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
