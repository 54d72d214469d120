pub mod browser;
pub mod core;
pub mod detectors;
pub mod extract;
pub mod humanize;
pub mod orchestrator;
pub mod pace;
pub mod probe;
pub mod report;
pub mod samples;

// --- Primary core exports ---
pub use crate::core::config;
pub use crate::core::types;
pub use crate::core::types::*;

pub use humanize::HumanizationClient;
pub use orchestrator::TestOrchestrator;
pub use probe::DetectorProbe;
