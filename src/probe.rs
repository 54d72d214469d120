//! Browser-driven detector probes.
//!
//! A probe is one attempt to get a verdict for one (text, detector) pair:
//! navigate, inject the text verbatim, trigger analysis, settle, extract,
//! screenshot. The probe boundary is a hard resilience line: *nothing*
//! thrown by the page, the driver, or the extractor escapes to the caller;
//! every failure becomes a `ProbeResult` with the `"ERROR"` verdict and the
//! message attached. One broken detector must never sink the batch.

use crate::browser::BrowserSession;
use crate::core::config;
use crate::core::types::ProbeResult;
use crate::detectors::DetectorConfig;
use crate::extract::{self, NO_VERDICT};
use crate::orchestrator::DetectorRunner;
use crate::pace::Pacer;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

/// Sentinel verdict for probes that failed outright (as opposed to loading
/// the page fine but finding no score, which is [`NO_VERDICT`]).
pub const VERDICT_ERROR: &str = "ERROR";

/// Failure taxonomy for the probe steps. All variants are converted into an
/// `ERROR` result at the probe boundary; navigation failures additionally
/// indicate the environment itself is broken and are logged loudly.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },
    #[error("input field {selector:?} not found within {timeout_ms} ms")]
    InputTimeout { selector: String, timeout_ms: u64 },
    #[error("no analyze trigger found on the page")]
    TriggerMissing,
    #[error("page interaction failed: {0}")]
    Interaction(String),
    #[error("could not capture page HTML: {0}")]
    Capture(String),
}

pub struct DetectorProbe {
    session: BrowserSession,
    pacer: Arc<dyn Pacer>,
    screenshots_dir: PathBuf,
}

impl DetectorProbe {
    pub fn new(session: BrowserSession, pacer: Arc<dyn Pacer>, screenshots_dir: PathBuf) -> Self {
        Self {
            session,
            pacer,
            screenshots_dir,
        }
    }

    /// Hand the browser session back for shutdown.
    pub async fn close(self) {
        self.session.close().await;
    }

    /// Run one probe. Never returns an error; see module docs.
    pub async fn probe(&self, detector: &DetectorConfig, text: &str, label: &str) -> ProbeResult {
        info!("Probing {} ({})", detector.name, label);

        let page = match self.session.open_page().await {
            Ok(page) => page,
            Err(e) => {
                // Could not even get a tab: infrastructure is broken, and
                // there is no page to screenshot.
                warn!("{}: failed to open tab: {:#}", detector.name, e);
                return ProbeResult {
                    verdict: VERDICT_ERROR.to_string(),
                    screenshot: None,
                    success: false,
                    error: Some(format!("failed to open tab: {}", e)),
                };
            }
        };

        let outcome = self.drive(&page, detector, text).await;

        // Screenshot unconditionally: a failed probe's screenshot is usually
        // the fastest way to see *why* it failed.
        let screenshot = self.capture_screenshot(&page, detector.name, label).await;
        if let Err(e) = page.close().await {
            warn!("{}: tab close error (non-fatal): {}", detector.name, e);
        }

        let result = assemble_result(outcome, screenshot);
        match (&result.error, result.success) {
            (Some(e), _) => warn!("{} ({}) probe failed: {}", detector.name, label, e),
            (None, true) => info!("{} ({}): verdict {:?}", detector.name, label, result.verdict),
            (None, false) => warn!("{} ({}): no verdict extracted", detector.name, label),
        }
        result
    }

    /// Steps 1–6: navigate → locate input → inject → trigger → settle →
    /// extract. Returns the verdict text (possibly [`NO_VERDICT`]).
    async fn drive(
        &self,
        page: &Page,
        detector: &DetectorConfig,
        text: &str,
    ) -> Result<String, ProbeError> {
        page.goto(detector.url)
            .await
            .map_err(|e| ProbeError::Navigation {
                url: detector.url.to_string(),
                message: e.to_string(),
            })?;

        let input = wait_for_element(page, detector.input_selector, config::locate_timeout())
            .await?;

        // Clear any prefilled demo text, then inject the sample verbatim.
        // No sanitization; the detectors must see byte-identical input.
        let clear_script = format!(
            "(() => {{ const el = document.querySelector({}); if (el) el.value = ''; return true; }})()",
            serde_json::to_string(detector.input_selector)
                .map_err(|e| ProbeError::Interaction(e.to_string()))?
        );
        page.evaluate(clear_script)
            .await
            .map_err(|e| ProbeError::Interaction(format!("clearing input: {}", e)))?;

        input
            .click()
            .await
            .map_err(|e| ProbeError::Interaction(format!("focusing input: {}", e)))?;
        input
            .type_str(text)
            .await
            .map_err(|e| ProbeError::Interaction(format!("typing text: {}", e)))?;

        click_trigger(page, detector, config::locate_timeout()).await?;

        // Fixed settle: the pages are asynchronous and expose no completion
        // signal we can poll reliably.
        let settle = config::settle_override().unwrap_or(detector.settle);
        self.pacer.pause(settle).await;

        let html = page
            .content()
            .await
            .map_err(|e| ProbeError::Capture(e.to_string()))?;

        Ok(extract::extract_verdict(
            &html,
            detector.result_selectors,
            detector.fallback,
        ))
    }

    /// Step 7: PNG screenshot named `{detector}_{label}_{unix_ts}.png`.
    /// Best-effort; a capture failure costs us the artifact, not the probe.
    async fn capture_screenshot(
        &self,
        page: &Page,
        detector: &str,
        label: &str,
    ) -> Option<String> {
        let bytes = match page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(false)
                    .build(),
            )
            .await
        {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("{}: screenshot capture failed: {}", detector, e);
                return None;
            }
        };

        if let Err(e) = std::fs::create_dir_all(&self.screenshots_dir) {
            warn!("Failed to create screenshots dir: {}", e);
            return None;
        }
        let filename = format!("{}_{}_{}.png", detector, label, chrono::Utc::now().timestamp());
        let path = self.screenshots_dir.join(filename);
        if let Err(e) = std::fs::write(&path, &bytes) {
            warn!("Failed to write screenshot {:?}: {}", path, e);
            return None;
        }
        Some(path.to_string_lossy().to_string())
    }
}

#[async_trait]
impl DetectorRunner for DetectorProbe {
    async fn probe(&self, detector: &DetectorConfig, text: &str, label: &str) -> ProbeResult {
        DetectorProbe::probe(self, detector, text, label).await
    }
}

/// Fold a drive outcome plus the (already captured) screenshot path into the
/// final result. The three shapes: extracted verdict, loaded-but-no-verdict
/// ([`NO_VERDICT`], unsuccessful, no error), and a drive failure
/// ([`VERDICT_ERROR`] with the message attached).
fn assemble_result(outcome: Result<String, ProbeError>, screenshot: Option<String>) -> ProbeResult {
    match outcome {
        Ok(verdict) => {
            let success = verdict != NO_VERDICT;
            ProbeResult {
                verdict,
                screenshot,
                success,
                error: None,
            }
        }
        Err(e) => ProbeResult {
            verdict: VERDICT_ERROR.to_string(),
            screenshot,
            success: false,
            error: Some(e.to_string()),
        },
    }
}

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Retry `attempt` until it yields a value or `timeout` elapses. Always makes
/// at least one attempt, even with a zero timeout.
async fn poll_until<T, F, Fut>(timeout: Duration, mut attempt: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Option<T>>,
{
    let start = Instant::now();
    loop {
        if let Some(value) = attempt().await {
            return Some(value);
        }
        if start.elapsed() >= timeout {
            return None;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Poll for an element until it appears or the bounded wait elapses. A miss
/// here is a recoverable probe failure, not fatal to the run.
async fn wait_for_element(
    page: &Page,
    selector: &str,
    timeout: Duration,
) -> Result<chromiumoxide::Element, ProbeError> {
    poll_until(timeout, || async move {
        page.find_element(selector).await.ok()
    })
    .await
    .ok_or_else(|| ProbeError::InputTimeout {
        selector: selector.to_string(),
        timeout_ms: timeout.as_millis() as u64,
    })
}

/// Activate the analyze control: CSS candidates first, then a label-text scan
/// over visible buttons (wording outlives class names on these pages). The
/// whole attempt is retried under the bounded wait because these pages
/// hydrate the button well after the textarea is usable.
async fn click_trigger(
    page: &Page,
    detector: &DetectorConfig,
    timeout: Duration,
) -> Result<(), ProbeError> {
    let labels = serde_json::to_string(detector.trigger_labels)
        .map_err(|e| ProbeError::Interaction(e.to_string()))?;
    let script = format!(
        r#"(() => {{
            const labels = {labels}.map(l => l.toLowerCase());
            const candidates = Array.from(document.querySelectorAll(
                "button, [role='button'], input[type='submit'], input[type='button']"
            ));
            for (const el of candidates) {{
                const text = (el.innerText || el.value || '').trim().toLowerCase();
                if (!text) continue;
                if (labels.some(l => text.includes(l))) {{
                    el.click();
                    return true;
                }}
            }}
            return false;
        }})()"#
    );

    poll_until(timeout, || {
        let script = script.clone();
        async move {
            for selector in detector.trigger_selectors {
                if let Ok(element) = page.find_element(*selector).await {
                    if element.click().await.is_ok() {
                        return Some(());
                    }
                }
            }
            match page.evaluate(script).await {
                Ok(eval) => eval
                    .into_value::<bool>()
                    .unwrap_or(false)
                    .then_some(()),
                Err(_) => None,
            }
        }
    })
    .await
    .ok_or(ProbeError::TriggerMissing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn extracted_verdict_is_a_success() {
        let result = assemble_result(Ok("84.13%".to_string()), Some("shots/z.png".to_string()));
        assert!(result.success);
        assert_eq!(result.verdict, "84.13%");
        assert_eq!(result.screenshot.as_deref(), Some("shots/z.png"));
        assert!(result.error.is_none());
    }

    #[test]
    fn missing_verdict_is_unsuccessful_but_not_an_error() {
        let result = assemble_result(Ok(NO_VERDICT.to_string()), None);
        assert!(!result.success);
        assert_eq!(result.verdict, NO_VERDICT);
        assert!(result.error.is_none());
    }

    #[test]
    fn drive_failures_become_error_results_and_keep_the_screenshot() {
        let result = assemble_result(
            Err(ProbeError::TriggerMissing),
            Some("shots/gptzero_heavy_original_1.png".to_string()),
        );
        assert_eq!(result.verdict, VERDICT_ERROR);
        assert!(!result.success);
        assert_eq!(
            result.screenshot.as_deref(),
            Some("shots/gptzero_heavy_original_1.png")
        );
        assert!(result.error.unwrap().contains("trigger"));
    }

    #[test]
    fn navigation_failure_carries_the_url_in_the_message() {
        let result = assemble_result(
            Err(ProbeError::Navigation {
                url: "https://gptzero.me".to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            }),
            None,
        );
        assert_eq!(result.verdict, VERDICT_ERROR);
        assert!(result.error.unwrap().contains("https://gptzero.me"));
    }

    #[tokio::test]
    async fn poll_until_retries_until_a_value_appears() {
        let attempts = AtomicU32::new(0);
        let value = poll_until(Duration::from_secs(5), || {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move { (n >= 3).then_some(n) }
        })
        .await;
        assert_eq!(value, Some(3));
    }

    #[tokio::test]
    async fn poll_until_gives_up_after_the_deadline() {
        let attempts = AtomicU32::new(0);
        let value: Option<()> = poll_until(Duration::ZERO, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async move { None }
        })
        .await;
        assert!(value.is_none());
        // Zero timeout still gets exactly one attempt.
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
