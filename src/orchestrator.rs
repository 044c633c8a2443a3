/// Extraction orchestration: sequencing, single-flight and recovery
///
/// The orchestrator owns the per-tab session and video context and is the
/// only component that mutates them. Every extraction-path error is caught
/// here, converted to a notification and reported upstream; none are
/// silently swallowed and none are fatal.
use crate::captions::CaptionResolver;
use crate::config::Config;
use crate::csv;
use crate::error::{Result, SubtidexError};
use crate::host::{sanitize_filename, DownloadId, Downloader, TabHost};
use crate::messaging::{Envelope, PageChannel, Request, Response};
use crate::notify::Notification;
use crate::page::{PageInspector, VideoContext};
use crate::session::{ExtractionSession, SessionState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Coordinates page inspection, caption resolution, formatting and delivery
#[derive(Clone)]
pub struct Orchestrator {
    resolver: Arc<CaptionResolver>,
    inspector: Arc<dyn PageInspector>,
    downloader: Arc<dyn Downloader>,
    tabs: Arc<dyn TabHost>,
    page: Arc<dyn PageChannel>,
    session: Arc<Mutex<ExtractionSession>>,
    context: Arc<Mutex<VideoContext>>,
    notifications: mpsc::UnboundedSender<Notification>,
    reload_settle: Duration,
    reinject_settle: Duration,
}

impl Orchestrator {
    /// Build an orchestrator and the notification stream it reports on
    pub fn new(
        resolver: Arc<CaptionResolver>,
        inspector: Arc<dyn PageInspector>,
        downloader: Arc<dyn Downloader>,
        tabs: Arc<dyn TabHost>,
        page: Arc<dyn PageChannel>,
        config: &Config,
    ) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (notifications, notification_rx) = mpsc::unbounded_channel();

        let orchestrator = Self {
            resolver,
            inspector,
            downloader,
            tabs,
            page,
            session: Arc::new(Mutex::new(ExtractionSession::new())),
            context: Arc::new(Mutex::new(VideoContext::none())),
            notifications,
            reload_settle: config.reload_settle_delay(),
            reinject_settle: config.reinject_settle_delay(),
        };

        (orchestrator, notification_rx)
    }

    pub async fn current_context(&self) -> VideoContext {
        self.context.lock().await.clone()
    }

    pub async fn session_state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    /// Replace the live video context
    ///
    /// Called by the navigation watcher on every identity change; any
    /// in-flight extraction for the previous identity becomes stale.
    pub async fn on_navigation(&self, context: VideoContext) {
        let mut current = self.context.lock().await;
        if *current == context {
            return;
        }

        info!(
            "🧭 Page changed, video: {:?}",
            context.video_id.as_deref().unwrap_or("none")
        );
        *current = context.clone();
        self.session
            .lock()
            .await
            .reset(context.video_id.as_deref());
    }

    /// Start an extraction attempt for the current video
    ///
    /// Replies busy while an attempt is in flight; otherwise the attempt
    /// runs in the background and its outcome surfaces as a notification.
    pub async fn request_extraction(&self) -> Response {
        let video_id = self.context.lock().await.video_id.clone();

        let generation = match self.session.lock().await.try_begin(video_id.as_deref()) {
            Some(generation) => generation,
            None => {
                debug!("Extraction already in progress, rejecting request");
                return Response::busy();
            }
        };

        let this = self.clone();
        tokio::spawn(async move {
            this.run_extraction(generation).await;
        });

        Response::started()
    }

    async fn run_extraction(&self, generation: u64) {
        let outcome = self.extract().await;

        let accepted = self
            .session
            .lock()
            .await
            .finish(generation, outcome.is_ok());
        if !accepted {
            debug!("Dropping extraction result for superseded video");
            return;
        }

        match outcome {
            Ok(download_id) => {
                info!("✅ Subtitles delivered (download {})", download_id);
                self.notify(Notification::success("Subtitles downloaded successfully!"));
            }
            Err(e) => {
                error!("Extraction failed: {}", e);
                self.notify(Notification::error(format!("Error: {}", e)));
            }
        }
    }

    /// One full pass: locate page, resolve captions, format, deliver
    async fn extract(&self) -> Result<DownloadId> {
        let context = self.context.lock().await.clone();
        if !context.is_video_page {
            return Err(SubtidexError::NotAVideoPage);
        }

        let title = match self.inspector.video_title().await {
            Some(title) => title,
            None => format!(
                "youtube_video_{}",
                context.video_id.as_deref().unwrap_or("unknown")
            ),
        };
        info!("🎬 Extracting subtitles for \"{}\"", title);

        let cues = self.resolver.resolve(self.inspector.as_ref()).await?;
        info!("Found {} subtitle entries", cues.len());

        let document = csv::to_csv(&cues)?;
        self.deliver(document, title).await
    }

    /// Hand a finished document to the download capability
    async fn deliver(&self, data: String, video_title: String) -> Result<DownloadId> {
        let filename = sanitize_filename(&video_title);
        self.downloader.download(&data, &filename).await
    }

    /// Recovery path for an unready page context
    ///
    /// Reload the tab and retry once after a settling delay; if the channel
    /// is still unavailable, re-establish the page context and retry a final
    /// time before giving up.
    pub async fn reload_and_extract(&self, tab_id: u32) -> Response {
        match self.page.request(Request::StartExtraction).await {
            Ok(response) => return response,
            Err(SubtidexError::ChannelUnavailable) => {
                warn!("Page context not ready, reloading tab {}", tab_id);
            }
            Err(e) => return Response::error(e.to_string()),
        }

        if let Err(e) = self.tabs.reload_tab(tab_id).await {
            return Response::error(e.to_string());
        }
        sleep(self.reload_settle).await;

        match self.page.request(Request::StartExtraction).await {
            Ok(response) => return response,
            Err(SubtidexError::ChannelUnavailable) => {
                warn!("Page context still unavailable, re-injecting");
            }
            Err(e) => return Response::error(e.to_string()),
        }

        if let Err(e) = self.tabs.reinject_page_context(tab_id).await {
            return Response::error(e.to_string());
        }
        sleep(self.reinject_settle).await;

        match self.page.request(Request::StartExtraction).await {
            Ok(response) => response,
            Err(e) => {
                self.notify(Notification::error(
                    "Failed to communicate with YouTube page",
                ));
                Response::error(e.to_string())
            }
        }
    }

    /// Dispatch one request to its handler
    pub async fn handle_request(&self, request: Request) -> Response {
        debug!("Handling request: {:?}", request);

        match request {
            Request::StartExtraction | Request::RetryExtraction => {
                self.request_extraction().await
            }
            Request::DownloadCsv { data, video_title } => {
                match self.deliver(data, video_title).await {
                    Ok(download_id) => Response::success(Some(download_id)),
                    Err(e) => {
                        error!("Download failed: {}", e);
                        self.notify(Notification::error(format!("Error: {}", e)));
                        Response::error(e.to_string())
                    }
                }
            }
            Request::PageUpdated {
                is_video_page,
                video_id,
            } => {
                self.on_navigation(VideoContext {
                    video_id,
                    is_video_page,
                })
                .await;
                Response::success(None)
            }
            Request::ReloadAndExtract { tab_id } => {
                // The reply cannot wait for the full recovery sequence; run
                // it in the background like a plain extraction attempt.
                let this = self.clone();
                tokio::spawn(async move {
                    this.reload_and_extract(tab_id).await;
                });
                Response::started()
            }
        }
    }

    /// Serve requests from a relay until the sending side closes
    pub async fn serve(self, mut rx: mpsc::Receiver<Envelope>) {
        while let Some(envelope) = rx.recv().await {
            let response = self.handle_request(envelope.request).await;
            let _ = envelope.reply.send(response);
        }
        debug!("Message loop ended");
    }

    fn notify(&self, notification: Notification) {
        // The UI surface may be gone; nothing to do about it here
        let _ = self.notifications.send(notification);
    }
}
