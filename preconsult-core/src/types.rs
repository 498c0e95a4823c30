use crate::answer::Answer;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One question attempt, recorded exactly once and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// 1-based position in the question list.
    pub question_number: usize,
    /// The question exactly as asked.
    pub question: String,
    pub answer: Answer,
    pub captured_at: DateTime<Local>,
}

impl ResponseRecord {
    pub fn new(question_number: usize, question: impl Into<String>, answer: Answer) -> Self {
        Self {
            question_number,
            question: question.into(),
            answer,
            captured_at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn record_keeps_question_text_verbatim() {
        let r = ResponseRecord::new(3, "What is your age?", Answer::Text("forty".into()));
        assert_eq!(r.question_number, 3);
        assert_eq!(r.question, "What is your age?");
        assert!(r.answer.is_valid());
    }
}
