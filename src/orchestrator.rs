//! Per-sample pipeline: probe the original text on every detector, humanize,
//! then probe the humanized text, or bail out early to a FAILED report when
//! the humanizer yields nothing (there is nothing meaningful to re-test).
//!
//! The flow is linear and never revisits a stage. Both collaborators sit
//! behind traits so tests can run the exact control flow against mocks.

use crate::core::config;
use crate::core::types::{
    DetectorScores, ExpectedRanges, ProbeResult, RunStatus, Sample, SampleReport, TextStats,
};
use crate::detectors::DetectorConfig;
use crate::pace::Pacer;
use crate::report;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[async_trait]
pub trait Humanizer: Send + Sync {
    /// `None` means the service gate could not be passed for this text.
    async fn humanize(&self, text: &str) -> Option<String>;
}

#[async_trait]
pub trait DetectorRunner: Send + Sync {
    /// Must not fail: probe errors degrade into the result's sentinels.
    async fn probe(&self, detector: &DetectorConfig, text: &str, label: &str) -> ProbeResult;
}

// Allow passing a borrowed runner so the caller keeps ownership of the
// browser session and can close it after the batch.
#[async_trait]
impl<T: DetectorRunner + ?Sized> DetectorRunner for &T {
    async fn probe(&self, detector: &DetectorConfig, text: &str, label: &str) -> ProbeResult {
        (**self).probe(detector, text, label).await
    }
}

pub struct TestOrchestrator<H, R> {
    humanizer: H,
    runner: R,
    detectors: Vec<DetectorConfig>,
    results_dir: PathBuf,
    pacer: Arc<dyn Pacer>,
}

impl<H: Humanizer, R: DetectorRunner> TestOrchestrator<H, R> {
    pub fn new(
        humanizer: H,
        runner: R,
        detectors: Vec<DetectorConfig>,
        results_dir: PathBuf,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            humanizer,
            runner,
            detectors,
            results_dir,
            pacer,
        }
    }

    /// Run one sample end to end. Always produces a report: a humanization
    /// failure yields a FAILED report, never a crash, so one bad sample
    /// cannot stop the batch.
    pub async fn run_sample(&self, sample: &Sample) -> SampleReport {
        info!("=== Sample {:?} ({}) ===", sample.name, sample.title);

        // Stage 1: score the original text on every detector.
        let original = self
            .probe_round(&sample.text, &format!("{}_original", sample.name))
            .await;
        self.pacer.pause(config::probe_delay()).await;

        // Stage 2: humanize through the challenge gate.
        let report = match self.humanizer.humanize(&sample.text).await {
            None => {
                warn!(
                    "Sample {:?}: humanization failed, skipping humanized probes",
                    sample.name
                );
                self.assemble(sample, original, None, None)
            }
            Some(humanized_text) => {
                // Stage 3: score the humanized text on the same detectors.
                let humanized = self
                    .probe_round(&humanized_text, &format!("{}_humanized", sample.name))
                    .await;
                self.assemble(sample, original, Some(humanized_text), Some(humanized))
            }
        };

        match report::save_report(&self.results_dir, &report) {
            Ok(path) => info!("Report saved to {}", path.display()),
            Err(e) => error!("Failed to persist report for {:?}: {:#}", sample.name, e),
        }

        report
    }

    async fn probe_round(&self, text: &str, label: &str) -> Vec<ProbeResult> {
        let mut results = Vec::with_capacity(self.detectors.len());
        for (i, detector) in self.detectors.iter().enumerate() {
            if i > 0 {
                // Courtesy delay so we don't hammer the third parties.
                self.pacer.pause(config::probe_delay()).await;
            }
            results.push(self.runner.probe(detector, text, label).await);
        }
        results
    }

    fn assemble(
        &self,
        sample: &Sample,
        original: Vec<ProbeResult>,
        humanized_text: Option<String>,
        humanized: Option<Vec<ProbeResult>>,
    ) -> SampleReport {
        let mut humanized = humanized
            .map(|results| results.into_iter().map(Some).collect::<Vec<_>>())
            .unwrap_or_else(|| vec![None; self.detectors.len()]);

        let detectors: BTreeMap<String, DetectorScores> = self
            .detectors
            .iter()
            .zip(original)
            .zip(humanized.drain(..))
            .map(|((detector, original), humanized)| {
                (
                    detector.name.to_string(),
                    DetectorScores {
                        original,
                        humanized,
                    },
                )
            })
            .collect();

        let (status, error) = match &humanized_text {
            Some(_) => (RunStatus::Success, None),
            None => (
                RunStatus::Failed,
                Some("Humanization via challenge gate failed".to_string()),
            ),
        };

        let text_stats = humanized_text
            .as_deref()
            .map(|humanized| TextStats::compare(&sample.text, humanized));

        SampleReport {
            sample: sample.name.clone(),
            sample_name: sample.title.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            status,
            error,
            expected: ExpectedRanges {
                original: sample.expected_original.clone(),
                humanized: sample.expected_humanized.clone(),
            },
            original_text: sample.text.clone(),
            humanized_text,
            text_stats,
            detectors,
        }
    }
}
