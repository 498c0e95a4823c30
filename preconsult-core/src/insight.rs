use crate::types::ResponseRecord;

/// Returned when no valid response exists; no analysis call is made.
pub const INSUFFICIENT_DATA_MESSAGE: &str =
    "No valid patient responses were captured. Unable to generate analytical insights.";

/// Returned when no analysis service is configured. Absence of a credential
/// is an expected configuration, not an error.
pub const BASIC_MODE_MESSAGE: &str =
    "Analytical insights unavailable: no analysis service configured. \
     Captured responses are listed below for manual review.";

/// Returned when the analysis call fails for any reason.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Unable to generate analytical insights due to a technical error.";

/// Splits responses into (valid, failed) keeping question order.
pub fn partition_responses(
    responses: &[ResponseRecord],
) -> (Vec<&ResponseRecord>, Vec<&ResponseRecord>) {
    responses.iter().partition(|r| r.answer.is_valid())
}

/// Builds the clinical-analysis prompt from the valid Q&A pairs.
///
/// The narrative structure is fixed: six sections plus follow-up probes.
/// Callers must only pass valid responses; sentinels would pollute the
/// analysis with capture noise.
pub fn build_insight_prompt(valid: &[&ResponseRecord]) -> String {
    let response_data = valid
        .iter()
        .map(|r| {
            format!(
                "Q{}: {} -> Answer: {}",
                r.question_number,
                r.question,
                r.answer.display_text()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an experienced physician analyzing patient consultation responses. \
Generate intelligent clinical insights following this exact format:\n\
\n\
PATIENT RESPONSES:\n\
{response_data}\n\
\n\
Provide analysis in this EXACT structure:\n\
\n\
Analytical Insights from Patient Responses\n\
\n\
Pain Profile\n\
[Analyze any pain-related responses, severity, duration, characteristics]\n\
\n\
Possible Triggers\n\
[Identify potential causes or triggers from patient responses]\n\
\n\
Medication Response\n\
[Analyze any medication usage mentioned and response]\n\
\n\
Chronic Condition Context\n\
[Examine any chronic conditions and their potential impact]\n\
\n\
Risk Assessment\n\
[Assess clinical urgency and identify any red flags]\n\
\n\
What Physician May Probe Further\n\
[List specific follow-up questions physician should ask]\n\
\n\
CRITICAL INSTRUCTIONS:\n\
- Only analyze information explicitly provided by the patient\n\
- Use medical reasoning to connect symptoms and responses\n\
- Be specific about clinical findings and patterns\n\
- Suggest logical follow-up questions\n\
- Do not speculate beyond provided information\n\
- Keep insights practical and clinically relevant"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::{Answer, CaptureFailure};

    fn record(n: usize, answer: Answer) -> ResponseRecord {
        ResponseRecord::new(n, format!("Question {n}?"), answer)
    }

    #[test]
    fn partitions_valid_and_failed_in_order() {
        let responses = vec![
            record(1, Answer::Failed(CaptureFailure::NoResponseTimeout)),
            record(2, Answer::Text("two".into())),
            record(3, Answer::Text("three".into())),
            record(4, Answer::Failed(CaptureFailure::Unrecognized)),
        ];

        let (valid, failed) = partition_responses(&responses);
        assert_eq!(
            valid.iter().map(|r| r.question_number).collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert_eq!(
            failed.iter().map(|r| r.question_number).collect::<Vec<_>>(),
            vec![1, 4]
        );
    }

    #[test]
    fn prompt_contains_all_six_sections() {
        let r = record(5, Answer::Text("pain is a 7".into()));
        let prompt = build_insight_prompt(&[&r]);

        for section in [
            "Pain Profile",
            "Possible Triggers",
            "Medication Response",
            "Chronic Condition Context",
            "Risk Assessment",
            "What Physician May Probe Further",
        ] {
            assert!(prompt.contains(section), "missing section: {section}");
        }
    }

    #[test]
    fn prompt_lists_each_valid_pair() {
        let a = record(1, Answer::Text("thirty five".into()));
        let b = record(5, Answer::Text("pain is a 7".into()));
        let prompt = build_insight_prompt(&[&a, &b]);

        assert!(prompt.contains("Q1: Question 1? -> Answer: thirty five"));
        assert!(prompt.contains("Q5: Question 5? -> Answer: pain is a 7"));
    }
}
