//! Resilient verdict extraction from captured detector HTML.
//!
//! Detector pages are hostile, unversioned HTML surfaces: class names churn,
//! result widgets get re-nested, and there is no API contract to lean on. The
//! extractor therefore runs an ordered chain of strategies and *degrades
//! instead of failing*: when everything misses it returns [`NO_VERDICT`],
//! never an error. Retries (if any) belong to the probe layer, not here.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Sentinel returned when no strategy located a verdict on the page.
pub const NO_VERDICT: &str = "Unable to extract";

/// Predicate applied to an element's own text during the fallback scan.
pub type TextPredicate = fn(&str) -> bool;

/// Pull a human-readable verdict string out of rendered page HTML.
///
/// Strategy order:
/// 1. Each CSS selector in `selectors`, in order. The first selector whose
///    first matching element carries non-empty trimmed text short-circuits.
/// 2. A document-order scan of every element whose *own* text (direct text
///    nodes, not descendants) satisfies `fallback`, e.g. "contains a percent
///    sign and a digit".
/// 3. [`NO_VERDICT`].
pub fn extract_verdict(html: &str, selectors: &[&str], fallback: TextPredicate) -> String {
    let doc = Html::parse_document(html);

    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            warn!("Skipping unparseable selector {:?}", raw);
            continue;
        };
        if let Some(element) = doc.select(&selector).next() {
            let text = squash_whitespace(&element.text().collect::<String>());
            if !text.is_empty() {
                return text;
            }
        }
    }

    for element in doc.root_element().descendants().filter_map(ElementRef::wrap) {
        // Script/style text nodes contain code, never verdicts.
        if matches!(element.value().name(), "script" | "style" | "noscript") {
            continue;
        }
        let own = squash_whitespace(&own_text(&element));
        if !own.is_empty() && fallback(&own) {
            return own;
        }
    }

    NO_VERDICT.to_string()
}

/// Text of the element's direct text-node children only. Scanning full
/// subtree text would make `<body>` swallow every fallback match.
fn own_text(element: &ElementRef) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text().map(|t| t.to_string()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn any_percent(t: &str) -> bool {
        t.contains('%') && t.chars().any(|c| c.is_ascii_digit())
    }

    fn never(_: &str) -> bool {
        false
    }

    #[test]
    fn first_matching_selector_short_circuits() {
        let html = r#"<html><body>
            <div class="percentage">12% AI</div>
            <div id="result">99% AI</div>
        </body></html>"#;
        let verdict = extract_verdict(html, &[".percentage", "#result"], any_percent);
        assert_eq!(verdict, "12% AI");
    }

    #[test]
    fn empty_text_selector_is_skipped_for_the_next_one() {
        let html = r#"<html><body>
            <div class="percentage">   </div>
            <div id="result">42% AI</div>
        </body></html>"#;
        let verdict = extract_verdict(html, &[".percentage", "#result"], never);
        assert_eq!(verdict, "42% AI");
    }

    #[test]
    fn falls_back_to_predicate_scan_when_no_selector_matches() {
        let html = r#"<html><body>
            <span class="totally-renamed">Your text is 37% likely AI</span>
        </body></html>"#;
        let verdict = extract_verdict(html, &[".percentage", "#result"], any_percent);
        assert_eq!(verdict, "Your text is 37% likely AI");
    }

    #[test]
    fn bare_percent_element_is_found_by_fallback() {
        // Redesigned page: nothing matches the configured selectors but a
        // stray element still shows "37%".
        let html = r#"<html><body><main><p>Result</p><b>37%</b></main></body></html>"#;
        let verdict = extract_verdict(html, &[".percentage"], any_percent);
        assert_eq!(verdict, "37%");
    }

    #[test]
    fn fallback_matches_own_text_not_container_text() {
        // The <div> subtree contains "55%", but only the <em> owns it; the
        // scan must return the tight match, not the whole container blob.
        let html = r#"<html><body>
            <div>lots of surrounding copy <em>55%</em> trailing text</div>
        </body></html>"#;
        let verdict = extract_verdict(html, &[], any_percent);
        assert_eq!(verdict, "55%");
    }

    #[test]
    fn returns_sentinel_when_everything_misses() {
        let html = "<html><body><p>No numbers here at all</p></body></html>";
        let verdict = extract_verdict(html, &[".percentage", "#result"], any_percent);
        assert_eq!(verdict, NO_VERDICT);
    }

    #[test]
    fn script_text_is_never_a_verdict() {
        let html = r#"<html><body>
            <script>var pct = "88%";</script>
            <p>clean page</p>
        </body></html>"#;
        let verdict = extract_verdict(html, &[], any_percent);
        assert_eq!(verdict, NO_VERDICT);
    }

    #[test]
    fn unparseable_selector_is_skipped_not_fatal() {
        let html = r#"<html><body><div id="score">7% AI</div></body></html>"#;
        let verdict = extract_verdict(html, &["[[[", "#score"], never);
        assert_eq!(verdict, "7% AI");
    }
}
