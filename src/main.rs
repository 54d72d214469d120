use std::sync::Arc;
use tracing::{info, warn};

use humanproof::browser::BrowserSession;
use humanproof::pace::{Pacer, SleepPacer};
use humanproof::{config, detectors, report, samples};
use humanproof::{DetectorProbe, HumanizationClient, TestOrchestrator};

struct CliArgs {
    sample: Option<String>,
    all: bool,
    headless: bool,
    help: bool,
}

fn parse_args() -> CliArgs {
    parse_from(std::env::args().skip(1))
}

fn parse_from<I>(args: I) -> CliArgs
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs {
        sample: None,
        all: false,
        headless: true,
        help: false,
    };

    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        if a == "--sample" {
            parsed.sample = args.next();
        } else if let Some(rest) = a.strip_prefix("--sample=") {
            parsed.sample = Some(rest.to_string());
        } else if a == "--all" {
            parsed.all = true;
        } else if a == "--no-headless" {
            parsed.headless = false;
        } else if a == "-h" || a == "--help" {
            parsed.help = true;
        } else {
            warn!("Ignoring unknown argument: {}", a);
        }
    }
    parsed
}

fn print_usage(sample_names: &[String]) {
    println!("humanproof: score original vs humanized text on real AI detectors\n");
    println!("Usage: humanproof [--sample <name> | --all] [--no-headless]\n");
    println!("  --sample <name>   Run a single sample ({})", sample_names.join(", "));
    println!("  --all             Run every built-in sample");
    println!("  --no-headless     Show the browser window (selector debugging)");
    println!("\nEnvironment: HUMANPROOF_API_BASE, HUMANPROOF_RESULTS_DIR, CHROME_EXECUTABLE");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = parse_args();
    let catalog = samples::builtin_samples();
    let sample_names: Vec<String> = catalog.iter().map(|s| s.name.clone()).collect();

    if args.help {
        print_usage(&sample_names);
        return Ok(());
    }

    let selected = if args.all {
        catalog
    } else if let Some(name) = &args.sample {
        match samples::find(&catalog, name) {
            Some(sample) => vec![sample.clone()],
            None => {
                anyhow::bail!(
                    "Unknown sample {:?}. Available: {}",
                    name,
                    sample_names.join(", ")
                );
            }
        }
    } else {
        print_usage(&sample_names);
        return Ok(());
    };

    info!(
        "Starting run: {} sample(s) against {}",
        selected.len(),
        config::api_base()
    );

    let humanizer = HumanizationClient::new(&config::api_base())?;
    let pacer: Arc<dyn Pacer> = Arc::new(SleepPacer);

    // One browser session for the whole run, exclusively owned here and
    // closed on the way out no matter how the samples went.
    let session = BrowserSession::launch(args.headless).await?;
    let probe = DetectorProbe::new(session, Arc::clone(&pacer), config::screenshots_dir());

    let mut reports = Vec::with_capacity(selected.len());
    {
        let orchestrator = TestOrchestrator::new(
            humanizer,
            &probe,
            detectors::all(),
            config::results_dir(),
            Arc::clone(&pacer),
        );

        for (i, sample) in selected.iter().enumerate() {
            if i > 0 {
                pacer.pause(config::sample_delay()).await;
            }
            // run_sample never fails: a bad sample yields a FAILED report and
            // the batch keeps going.
            let report = orchestrator.run_sample(sample).await;
            report::print_sample_summary(&report);
            reports.push(report);
        }
    }

    probe.close().await;
    report::print_run_summary(&reports);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        parse_from(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn defaults_are_headless_with_nothing_selected() {
        let args = parse(&[]);
        assert!(args.headless);
        assert!(!args.all);
        assert!(!args.help);
        assert!(args.sample.is_none());
    }

    #[test]
    fn sample_flag_accepts_both_spellings() {
        assert_eq!(parse(&["--sample", "heavy"]).sample.as_deref(), Some("heavy"));
        assert_eq!(parse(&["--sample=medium"]).sample.as_deref(), Some("medium"));
    }

    #[test]
    fn all_and_no_headless_toggle() {
        let args = parse(&["--all", "--no-headless"]);
        assert!(args.all);
        assert!(!args.headless);
    }

    #[test]
    fn unknown_arguments_are_ignored_not_fatal() {
        let args = parse(&["--bogus", "--all"]);
        assert!(args.all);
        assert!(args.sample.is_none());
    }
}
