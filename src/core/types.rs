use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Test inputs
// ---------------------------------------------------------------------------

/// One immutable text sample fed through the full pipeline.
///
/// `expected_original` / `expected_humanized` are descriptive range strings
/// ("80-95% AI", "<25% AI") carried into the report for a human reviewer;
/// nothing is asserted against them automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    /// Short machine name, used in file names and CLI selection ("heavy").
    pub name: String,
    /// Human-readable title ("Heavy AI (Academic)").
    pub title: String,
    pub text: String,
    pub expected_original: String,
    pub expected_humanized: String,
}

// ---------------------------------------------------------------------------
// Humanizer wire contract (analyze → submit-quiz)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Response of `POST /analyze`. One session per humanization attempt; the
/// session id is consumed by the subsequent `submit-quiz` call and never
/// reused.
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeSession {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub session_id: String,
    pub answers: Vec<String>,
}

/// Terminal response of `POST /submit-quiz`. `paraphrase.humanized` is only
/// meaningful when `passed` is true.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionOutcome {
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub evaluations: Option<serde_json::Value>,
    #[serde(default)]
    pub paraphrase: Option<Paraphrase>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paraphrase {
    #[serde(default)]
    pub humanized: Option<String>,
}

// ---------------------------------------------------------------------------
// Detector probe results & the per-sample report
// ---------------------------------------------------------------------------

/// Outcome of one browser probe against one detector page.
///
/// `verdict` is whatever human-readable score text the page exposed, or one
/// of the two sentinels: `"Unable to extract"` (page loaded, no score found)
/// and `"ERROR"` (the probe itself blew up; message in `error`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub verdict: String,
    /// Always populated when a screenshot could be written, including on
    /// failed probes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Original vs humanized verdicts for a single detector. `humanized` is
/// absent when humanization failed and the re-test was skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorScores {
    pub original: ProbeResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humanized: Option<ProbeResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedRanges {
    pub original: String,
    pub humanized: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStats {
    pub original_length: usize,
    pub humanized_length: usize,
    pub length_change: i64,
    /// A humanizer that returns its input unchanged "passed" the gate but did
    /// nothing; flagged here so a reviewer spots the silent no-op.
    pub texts_identical: bool,
}

impl TextStats {
    pub fn compare(original: &str, humanized: &str) -> Self {
        Self {
            original_length: original.len(),
            humanized_length: humanized.len(),
            length_change: humanized.len() as i64 - original.len() as i64,
            texts_identical: original == humanized,
        }
    }
}

/// Full record of one sample run. Assembled once at the end of the pipeline
/// and never mutated afterwards.
///
/// Status invariant: `status == Failed` exactly when the humanizer yielded no
/// text. Detector probe failures degrade into sentinel verdicts instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleReport {
    pub sample: String,
    pub sample_name: String,
    /// RFC 3339, assembly time.
    pub timestamp: String,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub expected: ExpectedRanges,
    pub original_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humanized_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_stats: Option<TextStats>,
    /// Keyed by detector name ("zerogpt", "gptzero").
    pub detectors: BTreeMap<String, DetectorScores>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_session_parses_wire_shape() {
        let body = r#"{
            "sessionId": "abc-123",
            "quiz": [
                {"question": "What is discussed?", "keywords": ["alpha", "beta"]},
                {"question": "And here?", "keywords": ["gamma"]}
            ]
        }"#;
        let session: ChallengeSession = serde_json::from_str(body).unwrap();
        assert_eq!(session.session_id, "abc-123");
        assert_eq!(session.quiz.len(), 2);
        assert_eq!(session.quiz[0].keywords, vec!["alpha", "beta"]);
    }

    #[test]
    fn submission_outcome_tolerates_missing_paraphrase() {
        let outcome: SubmissionOutcome =
            serde_json::from_str(r#"{"passed": false, "score": 2}"#).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.score, 2.0);
        assert!(outcome.paraphrase.is_none());
    }

    #[test]
    fn text_stats_flags_identical_texts() {
        let stats = TextStats::compare("same", "same");
        assert!(stats.texts_identical);
        assert_eq!(stats.length_change, 0);

        let stats = TextStats::compare("short", "a bit longer");
        assert!(!stats.texts_identical);
        assert_eq!(stats.length_change, 7);
    }

    #[test]
    fn run_status_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&RunStatus::Failed).unwrap(),
            "\"FAILED\""
        );
        assert_eq!(
            serde_json::to_string(&RunStatus::Success).unwrap(),
            "\"SUCCESS\""
        );
    }
}
