use async_trait::async_trait;
use preconsult_core::answer::CaptureFailure;
use preconsult_engine::traits::{SpeechBackend, SpeechInput};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Plays back scripted patient answers instead of listening. Used for demo
/// runs without a microphone; once the script runs out every question times
/// out.
#[derive(Debug)]
pub struct ScriptedSpeechInput {
    answers: Mutex<VecDeque<String>>,
}

impl ScriptedSpeechInput {
    pub fn new(answers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl SpeechInput for ScriptedSpeechInput {
    async fn listen(&self, _timeout: Duration) -> Result<String, CaptureFailure> {
        let next = self
            .answers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        next.ok_or(CaptureFailure::NoResponseTimeout)
    }
}

/// Prints questions to stdout instead of synthesizing audio.
#[derive(Debug, Default)]
pub struct ConsoleSpeaker;

#[async_trait]
impl SpeechBackend for ConsoleSpeaker {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn speak(&self, text: &str) -> anyhow::Result<()> {
        println!("[speaking] {text}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answers_play_back_in_order_then_time_out() {
        let input = ScriptedSpeechInput::new(["thirty five", "engineer"]);

        assert_eq!(
            input.listen(Duration::ZERO).await,
            Ok("thirty five".into())
        );
        assert_eq!(input.listen(Duration::ZERO).await, Ok("engineer".into()));
        assert_eq!(
            input.listen(Duration::ZERO).await,
            Err(CaptureFailure::NoResponseTimeout)
        );
    }
}
