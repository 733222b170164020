//! Job orchestrator for notice generation.
//!
//! The orchestrator drives a whole run:
//! - **Bootstrap**: the resolver session is started and awaited once
//! - **Fan-out**: one job per tracking code on a bounded worker pool
//! - **Shutdown**: bounded wait for in-flight jobs, never cancelling them

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::JobOrchestrator;
pub use types::{
    notice_file_name, JobError, JobOutcome, RunMode, RunPlan, RunSummary, TrackingJob,
};
