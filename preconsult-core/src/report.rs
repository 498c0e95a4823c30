use crate::insight::partition_responses;
use crate::types::{ResponseRecord, SessionId};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Data-quality tier derived from the number of valid responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityTier {
    Good,
    Fair,
    Poor,
}

impl QualityTier {
    /// Fixed thresholds on the valid-response count.
    pub fn from_valid_count(valid: usize) -> Self {
        if valid >= 7 {
            Self::Good
        } else if valid >= 4 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "GOOD",
            Self::Fair => "FAIR",
            Self::Poor => "POOR",
        }
    }
}

/// Completion percentage, rounded to the nearest integer.
///
/// The denominator is the number of responses actually attempted, not the
/// full question count: an interrupted session reports against what was
/// asked, so a clean partial run can still show 100%.
pub fn completion_percent(valid: usize, attempted: usize) -> u32 {
    if attempted == 0 {
        return 0;
    }
    ((valid as f64 / attempted as f64) * 100.0).round() as u32
}

/// Renders the physician-facing dashboard.
///
/// Pure function of its inputs; the orchestrator stores the result in
/// session state when the consultation completes.
pub fn render_dashboard(
    responses: &[ResponseRecord],
    insight: &str,
    generated_at: DateTime<Local>,
    session: SessionId,
) -> String {
    let (valid, failed) = partition_responses(responses);
    let valid_count = valid.len();
    let total_count = responses.len();
    let tier = QualityTier::from_valid_count(valid_count);
    let percent = completion_percent(valid_count, total_count);

    let mut out = format!(
        "# PHYSICIAN CONSULTATION DASHBOARD\n\
         \n\
         ## CONSULTATION SUMMARY\n\
         - **Date:** {date}\n\
         - **Session:** {session}\n\
         - **Data Quality:** {tier}\n\
         - **Completion Rate:** {percent}% ({valid_count}/{total_count} responses)\n\
         \n\
         ---\n\
         \n\
         ## {insight}\n\
         \n\
         ---\n\
         \n\
         ## COMPLETE RESPONSE RECORD\n\
         \n\
         ### PATIENT RESPONSES CAPTURED\n\n",
        date = generated_at.format("%B %d, %Y at %I:%M %p"),
        tier = tier.label(),
    );

    if valid.is_empty() {
        out.push_str("**No responses were successfully captured.**\n\n");
    } else {
        for r in &valid {
            out.push_str(&format!(
                "**Q{}:** {}\n**Answer:** {}\n*Time: {}*\n\n",
                r.question_number,
                r.question,
                r.answer.display_text(),
                r.captured_at.format("%H:%M:%S"),
            ));
        }
    }

    if !failed.is_empty() {
        out.push_str(&format!(
            "### FAILED TO CAPTURE ({} questions)\n",
            failed.len()
        ));
        for r in &failed {
            out.push_str(&format!(
                "**Q{}:** {} -> {}\n",
                r.question_number,
                r.question,
                r.answer.display_text(),
            ));
        }
    }

    out.push_str(&format!(
        "\n---\n*Generated by the voice pre-consultation system | \
         {valid_count}/{total_count} responses analyzed*",
    ));

    out
}
