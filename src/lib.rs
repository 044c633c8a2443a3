/// SubtideX - YouTube subtitle extraction pipeline
///
/// Detects YouTube video pages, extracts caption data through a chain of
/// fallback strategies, converts it to CSV and hands the document to a
/// download capability. Browser surfaces (page DOM, tab lifecycle,
/// downloads, messaging) are capability traits so the pipeline runs against
/// a live fetch, fixtures, or anything else that can implement them.

pub mod captions;
pub mod config;
pub mod csv;
pub mod error;
pub mod host;
pub mod messaging;
pub mod notify;
pub mod orchestrator;
pub mod page;
pub mod session;
pub mod watcher;

// Re-export main types for easy access
pub use crate::captions::{CaptionFetcher, CaptionResolver, HttpCaptionFetcher, SubtitleCue};
pub use crate::config::Config;
pub use crate::error::{Result, SubtidexError};
pub use crate::host::{Downloader, FsDownloader, TabHost};
pub use crate::messaging::{MessageRelay, PageChannel, Request, Response, Status};
pub use crate::notify::{Notification, NotificationKind};
pub use crate::orchestrator::Orchestrator;
pub use crate::page::{HttpPageInspector, PageInspector, VideoContext};
pub use crate::session::{ExtractionSession, SessionState};
pub use crate::watcher::NavigationWatcher;
