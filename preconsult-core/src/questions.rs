/// The fixed intake question list.
///
/// Exactly ten questions, asked in this order, never reordered or
/// randomized, so interviews are repeatable and records comparable.
pub const INTAKE_QUESTIONS: [&str; 10] = [
    "What is your age?",
    "What is your profession?",
    "What health issues are you currently facing?",
    "How long have you been facing this problem?",
    "On a scale of 1 to 10, how severe is your pain?",
    "Have you taken any medications for this problem?",
    "Have you eaten outside food in the last few days?",
    "Have you been in contact with any sick person recently?",
    "Do you have any chronic health conditions?",
    "Is there anything else about your health?",
];

pub const QUESTION_COUNT: usize = INTAKE_QUESTIONS.len();

pub fn intake_questions() -> Vec<String> {
    INTAKE_QUESTIONS.iter().map(|q| q.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_ten_questions_in_fixed_order() {
        let qs = intake_questions();
        assert_eq!(qs.len(), 10);
        assert_eq!(qs[0], "What is your age?");
        assert_eq!(qs[9], "Is there anything else about your health?");
    }
}
