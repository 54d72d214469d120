use std::path::PathBuf;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Env-var config resolution with typed fallbacks. Every knob has a default
// that matches the production service, so `humanproof --all` works with no
// environment at all.
// ---------------------------------------------------------------------------

/// Base URL of the humanizer API: `HUMANPROOF_API_BASE` → production default.
pub fn api_base() -> String {
    std::env::var("HUMANPROOF_API_BASE")
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "https://graspit.vercel.app/api".to_string())
}

/// Directory for JSON reports: `HUMANPROOF_RESULTS_DIR` → `results/`.
pub fn results_dir() -> PathBuf {
    std::env::var("HUMANPROOF_RESULTS_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("results"))
}

/// Screenshots live next to the reports.
pub fn screenshots_dir() -> PathBuf {
    results_dir().join("screenshots")
}

fn secs_env(key: &str, default: u64) -> Duration {
    Duration::from_secs(
        std::env::var(key)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(default),
    )
}

/// Timeout for `POST /analyze` (`HUMANPROOF_ANALYZE_TIMEOUT_SECS`, 30 s).
pub fn analyze_timeout() -> Duration {
    secs_env("HUMANPROOF_ANALYZE_TIMEOUT_SECS", 30)
}

/// Timeout for `POST /submit-quiz` (`HUMANPROOF_SUBMIT_TIMEOUT_SECS`, 60 s).
/// Longer than analyze: submission triggers the multi-LLM paraphrase work on
/// the service side.
pub fn submit_timeout() -> Duration {
    secs_env("HUMANPROOF_SUBMIT_TIMEOUT_SECS", 60)
}

/// Bounded wait for locating the detector input field
/// (`HUMANPROOF_LOCATE_TIMEOUT_SECS`, 15 s).
pub fn locate_timeout() -> Duration {
    secs_env("HUMANPROOF_LOCATE_TIMEOUT_SECS", 15)
}

/// Optional override of every detector's settle duration, in milliseconds
/// (`HUMANPROOF_SETTLE_MS`). Mostly useful to shorten local dry runs.
pub fn settle_override() -> Option<Duration> {
    std::env::var("HUMANPROOF_SETTLE_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Courtesy delay between consecutive detector probes (3 s). A politeness
/// convention towards the third-party services, not a correctness need.
pub fn probe_delay() -> Duration {
    secs_env("HUMANPROOF_PROBE_DELAY_SECS", 3)
}

/// Pause between samples when running `--all` (5 s).
pub fn sample_delay() -> Duration {
    secs_env("HUMANPROOF_SAMPLE_DELAY_SECS", 5)
}
