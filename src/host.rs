/// Host capabilities: tab lifecycle and file download
use crate::error::{Result, SubtidexError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Identifier handed back for a started download
pub type DownloadId = u64;

/// Characters that are illegal in filenames on at least one platform
const ILLEGAL_FILENAME_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Tab lifecycle capability
#[async_trait]
pub trait TabHost: Send + Sync {
    /// URL of the currently active tab, if any
    async fn active_tab_url(&self) -> Option<String>;

    /// Force a full reload of a tab
    async fn reload_tab(&self, tab_id: u32) -> Result<()>;

    /// Re-establish the page-resident script context in a tab
    async fn reinject_page_context(&self, tab_id: u32) -> Result<()>;
}

/// Download capability
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Persist the document under the suggested filename
    async fn download(&self, content: &str, suggested_filename: &str) -> Result<DownloadId>;
}

/// Build a download filename from a video title
///
/// Replaces characters illegal in filenames with `_`, preserving case and
/// everything else, then appends the `.csv` extension.
pub fn sanitize_filename(title: &str) -> String {
    let mut name: String = title
        .chars()
        .map(|c| {
            if ILLEGAL_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    name.push_str(".csv");
    name
}

/// Downloader that writes documents into an output directory
pub struct FsDownloader {
    output_dir: PathBuf,
    next_id: AtomicU64,
}

impl FsDownloader {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl Downloader for FsDownloader {
    async fn download(&self, content: &str, suggested_filename: &str) -> Result<DownloadId> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| SubtidexError::DownloadFailed(e.to_string()))?;

        let path = self.output_dir.join(suggested_filename);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| SubtidexError::DownloadFailed(e.to_string()))?;

        let download_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        info!("💾 Saved {} (download {})", path.display(), download_id);
        Ok(download_id)
    }
}

/// Tab host for environments without tabs
///
/// The CLI drives a single fetched document, so reload and re-injection
/// have nothing to act on; both succeed as no-ops.
pub struct NullTabHost;

#[async_trait]
impl TabHost for NullTabHost {
    async fn active_tab_url(&self) -> Option<String> {
        None
    }

    async fn reload_tab(&self, tab_id: u32) -> Result<()> {
        debug!("No tab {} to reload", tab_id);
        Ok(())
    }

    async fn reinject_page_context(&self, tab_id: u32) -> Result<()> {
        debug!("No tab {} to re-inject", tab_id);
        Ok(())
    }
}
