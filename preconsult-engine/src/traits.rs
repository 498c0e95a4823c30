use async_trait::async_trait;
use preconsult_core::answer::CaptureFailure;
use std::time::Duration;

/// One text-to-speech strategy in the fallback chain.
///
/// Backends report failure through the `Result`; the chain decides what
/// happens next. Implementations should not enforce their own deadline,
/// the chain bounds every attempt.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Speaks the text to completion.
    async fn speak(&self, text: &str) -> anyhow::Result<()>;
}

/// Bounded speech capture.
///
/// `listen` waits at most `timeout` for an utterance and transcribes it.
/// It never panics and never surfaces any error type other than the closed
/// `CaptureFailure` set: implementations classify everything that can go
/// wrong (silence, unintelligible audio, service trouble, device trouble)
/// into a sentinel. Ambient-noise calibration and the maximum phrase length
/// are the implementation's concern.
#[async_trait]
pub trait SpeechInput: Send + Sync {
    async fn listen(&self, timeout: Duration) -> Result<String, CaptureFailure>;
}

/// External clinical-analysis service.
///
/// The orchestrator treats this as optional: no configured backend means
/// the summary degrades to a fixed basic-mode message.
#[async_trait]
pub trait InsightBackend: Send + Sync {
    /// Produces a narrative for an already-built analysis prompt.
    async fn analyze(&self, prompt: &str) -> anyhow::Result<String>;
}
