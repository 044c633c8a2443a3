/// Per-tab extraction session state
///
/// The session is the system's only concurrency invariant: at most one
/// in-flight extraction per tab. It is owned exclusively by the orchestrator
/// and mutated only through it.
use tracing::debug;

/// Lifecycle of one extraction attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    InProgress,
    Completed,
    Failed,
}

/// Single-flight extraction record for one tab
///
/// Each accepted attempt gets a generation number; a result arriving with a
/// stale generation belongs to a superseded video identity and is discarded.
#[derive(Debug)]
pub struct ExtractionSession {
    state: SessionState,
    generation: u64,
    video_id: Option<String>,
}

impl ExtractionSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            generation: 0,
            video_id: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    /// Try to start an extraction attempt
    ///
    /// Returns the attempt's generation, or `None` when an attempt is
    /// already in flight (the caller replies busy).
    pub fn try_begin(&mut self, video_id: Option<&str>) -> Option<u64> {
        if self.state == SessionState::InProgress {
            return None;
        }

        self.generation += 1;
        self.state = SessionState::InProgress;
        self.video_id = video_id.map(str::to_string);
        Some(self.generation)
    }

    /// Record the outcome of an attempt
    ///
    /// Returns `false` when the attempt's generation is stale, in which case
    /// the state is left untouched and the result must be discarded.
    pub fn finish(&mut self, generation: u64, success: bool) -> bool {
        if generation != self.generation || self.state != SessionState::InProgress {
            debug!(
                "Discarding result for superseded extraction (generation {})",
                generation
            );
            return false;
        }

        self.state = if success {
            SessionState::Completed
        } else {
            SessionState::Failed
        };
        true
    }

    /// Reset to idle for a new video identity
    ///
    /// Advances the generation so any in-flight attempt becomes stale. The
    /// attempt itself is abandoned, not cancelled.
    pub fn reset(&mut self, video_id: Option<&str>) {
        self.generation += 1;
        self.state = SessionState::Idle;
        self.video_id = video_id.map(str::to_string);
    }
}

impl Default for ExtractionSession {
    fn default() -> Self {
        Self::new()
    }
}
