use crate::traits::SpeechBackend;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// A backend played the text aloud.
    Spoken { backend: &'static str },
    /// Every backend failed; the text was displayed instead. The user can
    /// still read the question, so this counts as success.
    Displayed,
}

impl SpeakOutcome {
    pub fn spoke_aloud(&self) -> bool {
        matches!(self, Self::Spoken { .. })
    }
}

/// Ordered text-to-speech fallback chain.
///
/// Backends are tried in priority order, each attempt bounded by a timeout
/// so a hung synthesizer cannot stall the interview. The terminal fallback
/// (displaying the text) always succeeds, which is why `speak` returns an
/// outcome rather than a `Result`.
pub struct SpeakerChain {
    backends: Vec<Arc<dyn SpeechBackend>>,
    attempt_timeout: Duration,
}

impl SpeakerChain {
    pub fn new(backends: Vec<Arc<dyn SpeechBackend>>) -> Self {
        Self {
            backends,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub async fn speak(&self, text: &str) -> SpeakOutcome {
        for backend in &self.backends {
            match tokio::time::timeout(self.attempt_timeout, backend.speak(text)).await {
                Ok(Ok(())) => {
                    log::debug!("spoke via {}", backend.name());
                    return SpeakOutcome::Spoken {
                        backend: backend.name(),
                    };
                }
                Ok(Err(e)) => {
                    log::warn!("speech backend {} failed: {e:#}", backend.name());
                }
                Err(_) => {
                    log::warn!(
                        "speech backend {} timed out after {:?}",
                        backend.name(),
                        self.attempt_timeout
                    );
                }
            }
        }

        log::warn!("all speech backends failed; displaying text instead");
        println!("\n============================================================");
        println!("AUDIO UNAVAILABLE - PLEASE READ:");
        println!("{text}");
        println!("============================================================\n");
        SpeakOutcome::Displayed
    }
}
