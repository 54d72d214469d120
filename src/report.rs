//! Report persistence and console summaries.

use crate::core::types::{RunStatus, SampleReport};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Write the report as pretty-printed JSON to
/// `{dir}/{sample}_{unix_ts}.json` and return the path.
pub fn save_report(dir: &Path, report: &SampleReport) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating results dir {}", dir.display()))?;

    let filename = format!("{}_{}.json", report.sample, chrono::Utc::now().timestamp());
    let path = dir.join(filename);
    let body = serde_json::to_string_pretty(report).context("serializing report")?;
    std::fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Per-sample summary printed right after a run.
pub fn print_sample_summary(report: &SampleReport) {
    println!("\n{}", "=".repeat(70));
    println!("📊 RESULTS: {}", report.sample_name);
    println!("{}", "=".repeat(70));

    for (detector, scores) in &report.detectors {
        println!("\n🔸 {}:", detector);
        println!("   Original:   {}", clip(&scores.original.verdict, 60));
        match &scores.humanized {
            Some(result) => println!("   Humanized:  {}", clip(&result.verdict, 60)),
            None => println!("   Humanized:  (skipped, humanization failed)"),
        }
    }

    if let Some(stats) = &report.text_stats {
        println!("\n🔸 Text stats:");
        println!("   Original length:   {} chars", stats.original_length);
        println!("   Humanized length:  {} chars", stats.humanized_length);
        println!("   Texts identical:   {}", stats.texts_identical);
    }
    if let Some(error) = &report.error {
        println!("\n⚠️  {}", error);
    }
    println!();
}

/// Final one-line-per-sample rollup at the end of the batch.
pub fn print_run_summary(reports: &[SampleReport]) {
    println!("\n{}", "=".repeat(70));
    println!("🎉 RUN COMPLETE");
    println!("{}", "=".repeat(70));
    for report in reports {
        let icon = match report.status {
            RunStatus::Success => "✅",
            RunStatus::Failed => "❌",
        };
        println!("{} {}: {:?}", icon, report.sample_name, report.status);
    }
    println!("{}\n", "=".repeat(70));
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        format!("{}…", text.chars().take(max).collect::<String>())
    }
}
