use preconsult_core::types::{ResponseRecord, SessionId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationStatus {
    Ready,
    Starting,
    Running,
    Complete,
    Stopped,
    Error,
}

impl ConsultationStatus {
    // A stable string label for display.
    // This is intentionally not derived from `Debug`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Stopped => "stopped",
            Self::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Stopped | Self::Error)
    }
}

/// Shared consultation state.
///
/// Owned by the orchestrator behind a mutex; the background task is the
/// only writer during a run, the control side reads snapshots. The
/// cooperative cancellation flag lives on the orchestrator as an atomic,
/// deliberately outside this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationState {
    pub session_id: SessionId,
    /// Append-only within a session, strict question order.
    pub responses: Vec<ResponseRecord>,
    /// 1-based number of the question currently in flight; 0 before start.
    pub current_question: usize,
    pub status: ConsultationStatus,
    pub progress_text: String,
    pub last_question: String,
    pub last_answer: String,
    /// Populated only at completion.
    pub summary_text: String,
    pub dashboard_text: String,
}

impl ConsultationState {
    pub fn new() -> Self {
        Self {
            session_id: SessionId::new(),
            responses: vec![],
            current_question: 0,
            status: ConsultationStatus::Ready,
            progress_text: "Ready to start consultation".into(),
            last_question: String::new(),
            last_answer: String::new(),
            summary_text: String::new(),
            dashboard_text: String::new(),
        }
    }

    /// Full reset at `start()`: fresh session id, everything else cleared.
    pub fn reset_for_start(&mut self) {
        *self = Self::new();
        self.status = ConsultationStatus::Starting;
        self.progress_text = "Starting consultation...".into();
    }
}

impl Default for ConsultationState {
    fn default() -> Self {
        Self::new()
    }
}
