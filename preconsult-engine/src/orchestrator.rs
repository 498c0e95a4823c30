use crate::capture::AnswerCapture;
use crate::runner::QuestionRunner;
use crate::session::{ConsultationState, ConsultationStatus};
use crate::speaker::SpeakerChain;
use crate::traits::{InsightBackend, SpeechBackend, SpeechInput};
use chrono::Local;
use preconsult_core::insight::{
    ANALYSIS_FAILED_MESSAGE, BASIC_MODE_MESSAGE, INSUFFICIENT_DATA_MESSAGE, build_insight_prompt,
    partition_responses,
};
use preconsult_core::questions::intake_questions;
use preconsult_core::report::render_dashboard;
use preconsult_core::types::ResponseRecord;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Presentation-ready view of the consultation, returned by every control
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub title: String,
    pub body: String,
    pub progress: String,
}

/// Pacing of the interview. Defaults match the live interview; tests run
/// with zero delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Bound on each speech-backend attempt.
    pub speak_attempt_timeout: Duration,
    /// Pause between announcing a question and listening.
    pub prepare_delay: Duration,
    /// Listening window per question.
    pub listen_timeout: Duration,
    /// Pause between consecutive questions (skipped after the last).
    pub between_questions: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            speak_attempt_timeout: Duration::from_secs(5),
            prepare_delay: Duration::from_secs(1),
            listen_timeout: Duration::from_secs(8),
            between_questions: Duration::from_secs(2),
        }
    }
}

impl OrchestratorConfig {
    /// No pacing at all; for tests.
    pub fn immediate() -> Self {
        Self {
            speak_attempt_timeout: Duration::from_secs(1),
            prepare_delay: Duration::ZERO,
            listen_timeout: Duration::ZERO,
            between_questions: Duration::ZERO,
        }
    }
}

struct OrchestratorInner {
    questions: Vec<String>,
    runner: QuestionRunner,
    speaker: Arc<SpeakerChain>,
    insight: Option<Arc<dyn InsightBackend>>,
    between_questions: Duration,
    state: Mutex<ConsultationState>,
    /// Cooperative cancellation flag, distinct from `status`. `true` is
    /// also the mutual-exclusion guard: at most one background task runs.
    running: AtomicBool,
}

/// The consultation state machine.
///
/// `start` spawns the question loop on a background task and returns
/// immediately; `poll` reads a snapshot; `stop` requests cooperative
/// cancellation, observed at the next question boundary. All three are safe
/// to call concurrently with the running loop.
///
/// Status flow: `Ready -> Starting -> Running -> {Complete | Stopped |
/// Error}`; any terminal state re-enters `Starting` via the full reset in
/// the next `start()`.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<OrchestratorInner>,
}

impl Orchestrator {
    pub fn new(
        backends: Vec<Arc<dyn SpeechBackend>>,
        input: Arc<dyn SpeechInput>,
        insight: Option<Arc<dyn InsightBackend>>,
        cfg: OrchestratorConfig,
    ) -> Self {
        Self::with_questions(backends, input, insight, cfg, intake_questions())
    }

    /// Same as `new` with a custom question list (tests, alternate scripts).
    pub fn with_questions(
        backends: Vec<Arc<dyn SpeechBackend>>,
        input: Arc<dyn SpeechInput>,
        insight: Option<Arc<dyn InsightBackend>>,
        cfg: OrchestratorConfig,
        questions: Vec<String>,
    ) -> Self {
        let speaker =
            Arc::new(SpeakerChain::new(backends).with_attempt_timeout(cfg.speak_attempt_timeout));
        let runner = QuestionRunner::new(
            speaker.clone(),
            AnswerCapture::new(input),
            cfg.prepare_delay,
            cfg.listen_timeout,
        );

        Self {
            inner: Arc::new(OrchestratorInner {
                questions,
                runner,
                speaker,
                insight,
                between_questions: cfg.between_questions,
                state: Mutex::new(ConsultationState::new()),
                running: AtomicBool::new(false),
            }),
        }
    }

    pub fn question_count(&self) -> usize {
        self.inner.questions.len()
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    pub async fn status(&self) -> ConsultationStatus {
        self.inner.state.lock().await.status
    }

    /// Full copy of the current state, for tests and diagnostics. `poll` is
    /// the presentation-facing read.
    pub async fn snapshot(&self) -> ConsultationState {
        self.inner.state.lock().await.clone()
    }

    /// Starts a consultation on a background task and returns immediately.
    ///
    /// Idempotent while running: a second `start` is a no-op that reports
    /// current progress without resetting anything.
    pub async fn start(&self) -> StatusView {
        let total = self.inner.questions.len();

        if self.inner.running.swap(true, Ordering::SeqCst) {
            let s = self.inner.state.lock().await;
            return StatusView {
                title: "Consultation already running".into(),
                body: s.progress_text.clone(),
                progress: format!("Current progress: question {}/{}", s.current_question, total),
            };
        }

        {
            let mut s = self.inner.state.lock().await;
            s.reset_for_start();
            log::info!("starting consultation session {}", s.session_id);
        }

        let this = self.clone();
        tokio::spawn(async move {
            this.run_consultation().await;
        });

        StatusView {
            title: "Consultation started".into(),
            body: "The consultation has begun. Questions are spoken aloud; \
                   poll for live progress and the final report."
                .into(),
            progress: format!("Question 1/{total} will begin shortly..."),
        }
    }

    /// Requests cooperative cancellation. The background task observes the
    /// cleared flag at its next question boundary; a stop issued mid-listen
    /// takes effect only after that question's capture returns.
    pub async fn stop(&self) -> StatusView {
        self.inner.running.store(false, Ordering::SeqCst);

        let mut s = self.inner.state.lock().await;
        s.status = ConsultationStatus::Stopped;
        log::info!("stop requested for session {}", s.session_id);

        StatusView {
            title: "Consultation stopped".into(),
            body: "The consultation has been stopped. Start a new one at any time.".into(),
            progress: "Stopped".into(),
        }
    }

    /// Pure read of the current state into a presentation triple.
    pub async fn poll(&self) -> StatusView {
        let total = self.inner.questions.len();
        let s = self.inner.state.lock().await;
        let recorded = s.responses.len();

        match s.status {
            ConsultationStatus::Complete => StatusView {
                title: "Consultation complete".into(),
                body: s.dashboard_text.clone(),
                progress: format!("All {recorded} questions completed"),
            },
            ConsultationStatus::Running | ConsultationStatus::Starting => StatusView {
                title: format!("Question {}/{} running...", s.current_question, total),
                body: format!(
                    "Consultation active\n\n\
                     Question: {}/{}\n\
                     Completed: {}/{} responses recorded\n\
                     Last question: {}\n\
                     Last answer: {}\n\n\
                     Current activity: {}",
                    s.current_question,
                    total,
                    recorded,
                    total,
                    if s.last_question.is_empty() {
                        "(starting)"
                    } else {
                        &s.last_question
                    },
                    if s.last_answer.is_empty() {
                        "(waiting)"
                    } else {
                        &s.last_answer
                    },
                    s.progress_text,
                ),
                progress: s.progress_text.clone(),
            },
            ConsultationStatus::Error => StatusView {
                title: "Consultation error".into(),
                body: format!(
                    "The consultation hit an unrecoverable error.\n\n\
                     {}\n\n\
                     Partial results: {recorded} responses were recorded before the error. \
                     A new consultation can be started at any time.",
                    s.progress_text,
                ),
                progress: "Error - restart needed".into(),
            },
            ConsultationStatus::Ready | ConsultationStatus::Stopped => StatusView {
                title: "No active consultation".into(),
                body: "Start a consultation to begin the medical interview.".into(),
                progress: s.progress_text.clone(),
            },
        }
    }

    async fn run_consultation(&self) {
        // The loop runs on its own task so a panicking adapter surfaces as
        // a JoinError here instead of unwinding past the flag reset below.
        let this = self.clone();
        let outcome = tokio::spawn(async move { this.consultation_loop().await }).await;

        let result = match outcome {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("consultation task panicked: {e}")),
        };

        if let Err(e) = result {
            log::error!("consultation failed: {e:#}");
            let mut s = self.inner.state.lock().await;
            s.status = ConsultationStatus::Error;
            s.progress_text = format!("Error: {e:#}");
        }

        self.inner.running.store(false, Ordering::SeqCst);
    }

    async fn consultation_loop(&self) -> anyhow::Result<()> {
        let total = self.inner.questions.len();

        {
            let mut s = self.inner.state.lock().await;
            s.status = ConsultationStatus::Running;
        }

        for (i, question) in self.inner.questions.iter().enumerate() {
            // Cancellation is checked only here, at iteration boundaries.
            if !self.inner.running.load(Ordering::SeqCst) {
                break;
            }

            self.inner
                .runner
                .run(i, question, total, &self.inner.state)
                .await;

            if i + 1 < total {
                {
                    let mut s = self.inner.state.lock().await;
                    s.progress_text = format!("Moving to question {}/{}...", i + 2, total);
                }
                tokio::time::sleep(self.inner.between_questions).await;
            }
        }

        if self.inner.running.load(Ordering::SeqCst) {
            self.finalize().await;
        } else {
            let mut s = self.inner.state.lock().await;
            s.status = ConsultationStatus::Stopped;
            s.progress_text = "Consultation was stopped before completion".into();
            log::info!(
                "session {} stopped after {} responses",
                s.session_id,
                s.responses.len()
            );
        }

        Ok(())
    }

    async fn finalize(&self) {
        let total = self.inner.questions.len();
        let (responses, session_id) = {
            let s = self.inner.state.lock().await;
            (s.responses.clone(), s.session_id)
        };
        let answered = responses.len();

        let closing = format!(
            "Thank you for completing {answered} questions. \
             Generating your medical summary now."
        );
        // Best-effort by construction: the chain falls back to display.
        let _ = self.inner.speaker.speak(&closing).await;

        {
            let mut s = self.inner.state.lock().await;
            s.progress_text = "Generating clinical analysis...".into();
        }

        let summary = self.summarize(&responses).await;
        let dashboard = render_dashboard(&responses, &summary, Local::now(), session_id);

        let mut s = self.inner.state.lock().await;
        s.summary_text = summary;
        s.dashboard_text = dashboard;
        s.status = ConsultationStatus::Complete;
        s.progress_text =
            format!("Consultation complete: {answered}/{total} questions answered");
        log::info!("session {session_id} complete: {answered}/{total} responses");
    }

    /// Classifies responses and produces the summary narrative. Degrades
    /// instead of failing: no valid data, no configured backend, and backend
    /// errors each map to a fixed message.
    async fn summarize(&self, responses: &[ResponseRecord]) -> String {
        let (valid, failed) = partition_responses(responses);
        log::info!(
            "generating insights from {} valid / {} failed responses",
            valid.len(),
            failed.len()
        );

        if valid.is_empty() {
            return INSUFFICIENT_DATA_MESSAGE.into();
        }

        let Some(backend) = self.inner.insight.as_ref() else {
            return BASIC_MODE_MESSAGE.into();
        };

        let prompt = build_insight_prompt(&valid);
        match backend.analyze(&prompt).await {
            Ok(narrative) => narrative,
            Err(e) => {
                log::warn!("insight generation failed: {e:#}");
                ANALYSIS_FAILED_MESSAGE.into()
            }
        }
    }
}
