use crate::capture::AnswerCapture;
use crate::session::ConsultationState;
use crate::speaker::SpeakerChain;
use preconsult_core::types::ResponseRecord;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Executes a single question: announce, prepare, listen, record.
///
/// Every step is fault-isolated. Speech output falls back to displayed
/// text, capture failures become sentinel answers, so one bad question can
/// never abort the interview.
pub struct QuestionRunner {
    speaker: Arc<SpeakerChain>,
    capture: AnswerCapture,
    prepare_delay: Duration,
    listen_timeout: Duration,
}

impl QuestionRunner {
    pub fn new(
        speaker: Arc<SpeakerChain>,
        capture: AnswerCapture,
        prepare_delay: Duration,
        listen_timeout: Duration,
    ) -> Self {
        Self {
            speaker,
            capture,
            prepare_delay,
            listen_timeout,
        }
    }

    pub async fn run(
        &self,
        index: usize,
        question: &str,
        total: usize,
        state: &Mutex<ConsultationState>,
    ) -> ResponseRecord {
        let number = index + 1;

        {
            let mut s = state.lock().await;
            s.current_question = number;
            s.last_question = question.to_string();
            s.progress_text = format!("Question {number}/{total}: {question}");
        }

        log::info!("question {number}/{total}: {question}");

        let outcome = self.speaker.speak(question).await;
        if !outcome.spoke_aloud() {
            log::info!("question {number} displayed as text; continuing");
        }

        {
            let mut s = state.lock().await;
            s.progress_text = format!("Question {number}/{total}: get ready to answer...");
        }
        tokio::time::sleep(self.prepare_delay).await;

        {
            let mut s = state.lock().await;
            s.progress_text = format!(
                "Question {number}/{total}: listening ({}s)",
                self.listen_timeout.as_secs()
            );
        }
        let answer = self.capture.capture(self.listen_timeout).await;

        // Build the record completely before it touches shared state, so a
        // concurrent poll can never observe a half-written response.
        let record = ResponseRecord::new(number, question, answer);

        {
            let mut s = state.lock().await;
            s.last_answer = record.answer.display_text().to_string();
            s.progress_text = format!(
                "Question {number}/{total}: recorded '{}'",
                record.answer.display_text()
            );
            s.responses.push(record.clone());
        }

        log::info!(
            "answer recorded for question {number}: '{}'",
            record.answer.display_text()
        );
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{SpeechBackend, SpeechInput};
    use async_trait::async_trait;
    use preconsult_core::answer::{Answer, CaptureFailure};

    struct SilentSpeaker;

    #[async_trait]
    impl SpeechBackend for SilentSpeaker {
        fn name(&self) -> &'static str {
            "silent"
        }

        async fn speak(&self, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct FixedInput(Result<String, CaptureFailure>);

    #[async_trait]
    impl SpeechInput for FixedInput {
        async fn listen(&self, _timeout: Duration) -> Result<String, CaptureFailure> {
            self.0.clone()
        }
    }

    fn runner(input: FixedInput) -> QuestionRunner {
        QuestionRunner::new(
            Arc::new(SpeakerChain::new(vec![Arc::new(SilentSpeaker)])),
            AnswerCapture::new(Arc::new(input)),
            Duration::ZERO,
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn records_answer_and_updates_state() {
        let state = Mutex::new(ConsultationState::new());
        let r = runner(FixedInput(Ok("software engineer".into())));

        let record = r.run(1, "What is your profession?", 10, &state).await;
        assert_eq!(record.question_number, 2);
        assert_eq!(record.answer, Answer::Text("software engineer".into()));

        let s = state.lock().await;
        assert_eq!(s.current_question, 2);
        assert_eq!(s.last_question, "What is your profession?");
        assert_eq!(s.last_answer, "software engineer");
        assert_eq!(s.responses.len(), 1);
        assert!(s.progress_text.contains("recorded"));
    }

    #[tokio::test]
    async fn capture_failure_still_yields_a_record() {
        let state = Mutex::new(ConsultationState::new());
        let r = runner(FixedInput(Err(CaptureFailure::NoResponseTimeout)));

        let record = r.run(0, "What is your age?", 10, &state).await;
        assert_eq!(
            record.answer,
            Answer::Failed(CaptureFailure::NoResponseTimeout)
        );

        let s = state.lock().await;
        assert_eq!(s.responses.len(), 1);
        assert_eq!(s.last_answer, "NO_RESPONSE_TIMEOUT");
    }
}
