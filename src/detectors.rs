//! Static configuration for the third-party detector pages we drive.
//!
//! There is no contract with these sites. Selectors below are the observed
//! markup plus generous `[class*=...]` nets; when they all drift, the
//! text-predicate fallback in `extract` keeps probes producing *something*.

use crate::extract::TextPredicate;
use std::time::Duration;

/// Everything a probe needs to drive one detector page.
#[derive(Clone)]
pub struct DetectorConfig {
    /// Short name used in report keys and screenshot file names.
    pub name: &'static str,
    pub url: &'static str,
    /// Locator for the text input. Comma-separated CSS alternatives are fine.
    pub input_selector: &'static str,
    /// CSS candidates for the analyze trigger, tried in order.
    pub trigger_selectors: &'static [&'static str],
    /// Button-label substrings tried when no CSS candidate matches. Detector
    /// buttons keep their wording far longer than their class names.
    pub trigger_labels: &'static [&'static str],
    /// Fixed post-trigger wait. These pages expose no reliable completion
    /// signal to poll, so a settle duration is an explicit trade-off.
    pub settle: Duration,
    /// Ordered result-selector chain handed to the extractor.
    pub result_selectors: &'static [&'static str],
    /// Fallback text predicate for when every selector misses.
    pub fallback: TextPredicate,
}

/// ZeroGPT reports a bare percentage; anything with a digit and a `%` in its
/// own text is a plausible verdict.
fn percent_with_digit(text: &str) -> bool {
    text.contains('%') && text.chars().any(|c| c.is_ascii_digit())
}

/// GPTZero verdicts are short sentences ("We are highly confident this text
/// is AI generated"). Accept compact mentions of AI/Human/percentages and
/// reject paragraph-length matches.
fn short_verdict_mention(text: &str) -> bool {
    (text.contains("AI") || text.contains("Human") || text.contains('%')) && text.len() < 100
}

pub fn zerogpt() -> DetectorConfig {
    DetectorConfig {
        name: "zerogpt",
        url: "https://www.zerogpt.com",
        input_selector: "textarea, #textArea",
        trigger_selectors: &["#detectBtn"],
        trigger_labels: &["Detect"],
        settle: Duration::from_secs(8),
        result_selectors: &[
            ".percentage",
            "#result",
            ".result-percentage",
            "[class*='percent']",
        ],
        fallback: percent_with_digit,
    }
}

pub fn gptzero() -> DetectorConfig {
    DetectorConfig {
        name: "gptzero",
        url: "https://gptzero.me",
        input_selector: "textarea",
        trigger_selectors: &["button[type='submit']"],
        trigger_labels: &["Scan", "Check"],
        // GPTZero runs several classifiers server-side; it is the slower of
        // the two.
        settle: Duration::from_secs(10),
        result_selectors: &[
            ".result-text",
            ".ai-result",
            "[class*='result']",
            "[class*='score']",
        ],
        fallback: short_verdict_mention,
    }
}

/// The probe roster, in execution order.
pub fn all() -> Vec<DetectorConfig> {
    vec![zerogpt(), gptzero()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_predicate_requires_a_digit() {
        assert!(percent_with_digit("37%"));
        assert!(percent_with_digit("Your text is 88.2% AI"));
        assert!(!percent_with_digit("percent sign only %"));
        assert!(!percent_with_digit("no symbols at all"));
    }

    #[test]
    fn verdict_mention_rejects_long_paragraphs() {
        assert!(short_verdict_mention("Likely written by a Human"));
        assert!(short_verdict_mention("92% AI probability"));
        let long = format!("AI {}", "x".repeat(120));
        assert!(!short_verdict_mention(&long));
        assert!(!short_verdict_mention("nothing relevant here"));
    }

    #[test]
    fn roster_has_two_detectors_in_order() {
        let roster = all();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].name, "zerogpt");
        assert_eq!(roster[1].name, "gptzero");
    }
}
