/// Typed messaging between the UI surface, the orchestrator and the page
/// context
///
/// Every request is a named action with a fixed payload shape; responses
/// carry a status plus action-specific fields. Round-trips are awaitable
/// operations over tokio channels rather than callback conventions.
use crate::error::{Result, SubtidexError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

/// Request actions understood by the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    StartExtraction,
    RetryExtraction,
    #[serde(rename = "downloadCSV", rename_all = "camelCase")]
    DownloadCsv {
        data: String,
        video_title: String,
    },
    #[serde(rename_all = "camelCase")]
    PageUpdated {
        is_video_page: bool,
        video_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ReloadAndExtract {
        tab_id: u32,
    },
}

/// Response status shared by every action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Started,
    Busy,
    Success,
    Error,
}

/// Response to a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn started() -> Self {
        Self {
            status: Status::Started,
            download_id: None,
            error: None,
        }
    }

    pub fn busy() -> Self {
        Self {
            status: Status::Busy,
            download_id: None,
            error: None,
        }
    }

    pub fn success(download_id: Option<u64>) -> Self {
        Self {
            status: Status::Success,
            download_id,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            download_id: None,
            error: Some(message.into()),
        }
    }
}

/// A request paired with its reply slot
#[derive(Debug)]
pub struct Envelope {
    pub request: Request,
    pub reply: oneshot::Sender<Response>,
}

/// Awaitable request channel into another context
///
/// Both ends failing (receiver gone, reply dropped) surface as
/// `ChannelUnavailable`, the signal for the orchestrator's recovery path.
#[async_trait]
pub trait PageChannel: Send + Sync {
    async fn request(&self, request: Request) -> Result<Response>;
}

/// Channel-backed relay endpoint
#[derive(Clone)]
pub struct MessageRelay {
    tx: mpsc::Sender<Envelope>,
}

impl MessageRelay {
    /// Create a relay and the receiving end a serving loop consumes
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Envelope>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl PageChannel for MessageRelay {
    async fn request(&self, request: Request) -> Result<Response> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let envelope = Envelope {
            request,
            reply: reply_tx,
        };

        self.tx
            .send(envelope)
            .await
            .map_err(|_| SubtidexError::ChannelUnavailable)?;

        reply_rx
            .await
            .map_err(|_| SubtidexError::ChannelUnavailable)
    }
}
