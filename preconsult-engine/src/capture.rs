use crate::traits::SpeechInput;
use preconsult_core::answer::Answer;
use std::sync::Arc;
use std::time::Duration;

/// Folds the speech input boundary into an `Answer`.
///
/// `capture` never fails: transcripts are normalized (trimmed, empty means
/// unrecognized) and capture failures become sentinel answers the rest of
/// the pipeline records like any other response.
pub struct AnswerCapture {
    input: Arc<dyn SpeechInput>,
}

impl AnswerCapture {
    pub fn new(input: Arc<dyn SpeechInput>) -> Self {
        Self { input }
    }

    pub async fn capture(&self, timeout: Duration) -> Answer {
        match self.input.listen(timeout).await {
            Ok(raw) => Answer::from_transcript(&raw),
            Err(failure) => {
                log::warn!("answer not captured: {}", failure.sentinel());
                Answer::Failed(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use preconsult_core::answer::CaptureFailure;

    struct FixedInput(Result<String, CaptureFailure>);

    #[async_trait]
    impl SpeechInput for FixedInput {
        async fn listen(&self, _timeout: Duration) -> Result<String, CaptureFailure> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn transcript_becomes_text_answer() {
        let capture = AnswerCapture::new(Arc::new(FixedInput(Ok("  thirty five ".into()))));
        let answer = capture.capture(Duration::ZERO).await;
        assert_eq!(answer, Answer::Text("thirty five".into()));
    }

    #[tokio::test]
    async fn empty_transcript_becomes_unrecognized() {
        let capture = AnswerCapture::new(Arc::new(FixedInput(Ok("   ".into()))));
        let answer = capture.capture(Duration::ZERO).await;
        assert_eq!(answer, Answer::Failed(CaptureFailure::Unrecognized));
    }

    #[tokio::test]
    async fn failure_becomes_sentinel_answer() {
        let capture = AnswerCapture::new(Arc::new(FixedInput(Err(
            CaptureFailure::NoResponseTimeout,
        ))));
        let answer = capture.capture(Duration::ZERO).await;
        assert_eq!(answer, Answer::Failed(CaptureFailure::NoResponseTimeout));
    }
}
