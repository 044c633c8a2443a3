/// Single-page-app navigation detection
///
/// The host site swaps videos without a full reload, so the watcher keeps
/// the last-seen URL and fires only when an observation differs from it.
/// Observations come from real navigation events or from a periodic
/// fallback poll; the debounced-compare semantics are identical for both,
/// which is what makes the watcher drivable by synthetic ticks in tests.
use crate::host::TabHost;
use crate::orchestrator::Orchestrator;
use crate::page::VideoContext;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub struct NavigationWatcher {
    last_url: Option<String>,
}

impl NavigationWatcher {
    pub fn new(initial_url: Option<&str>) -> Self {
        Self {
            last_url: initial_url.map(str::to_string),
        }
    }

    /// Compare a URL observation against the last-seen URL
    ///
    /// Returns the new page's context when the URL changed, `None` when it
    /// is the one already seen.
    pub fn observe(&mut self, url: &str) -> Option<VideoContext> {
        if self.last_url.as_deref() == Some(url) {
            return None;
        }

        info!(
            "🧭 URL changed from {} to {}",
            self.last_url.as_deref().unwrap_or("(none)"),
            url
        );
        self.last_url = Some(url.to_string());
        Some(VideoContext::from_url(url))
    }

    /// Drive the watcher until the event stream closes
    ///
    /// Navigation events arrive on `events`; between events a fallback poll
    /// compares the active tab's URL on a fixed interval. Every change is
    /// reported to the orchestrator, which resets any stale session.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<String>,
        tabs: Arc<dyn TabHost>,
        orchestrator: Orchestrator,
        poll_interval: Duration,
    ) {
        let mut ticker = tokio::time::interval(poll_interval);

        loop {
            let observed = tokio::select! {
                event = events.recv() => match event {
                    Some(url) => Some(url),
                    None => break,
                },
                _ = ticker.tick() => tabs.active_tab_url().await,
            };

            if let Some(url) = observed {
                if let Some(context) = self.observe(&url) {
                    orchestrator.on_navigation(context).await;
                }
            }
        }

        debug!("Navigation watcher stopped");
    }
}
