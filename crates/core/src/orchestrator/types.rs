//! Types for the job orchestrator.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::assembler::{AssemblerError, AssemblyReport};
use crate::config::RunConfig;
use crate::form::FormFieldMap;
use crate::resolver::ResolutionStatus;

/// Base name of every generated notice.
const NOTICE_STEM: &str = "Извещение";

/// Errors that fail a single job.
#[derive(Debug, Error)]
pub enum JobError {
    /// Archive could not be written.
    #[error("assembly failed: {0}")]
    Assembly(#[from] AssemblerError),

    /// The blocking worker panicked or was cancelled.
    #[error("worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// What a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One notice per tracking code.
    Codes,
    /// A single notice with every field blank.
    Empty,
}

/// Jobs to run, derived from configuration and command-line codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub mode: RunMode,
    pub tracking_codes: Vec<String>,
    /// Skip the resolver for the whole run.
    pub force_offline: bool,
}

impl RunPlan {
    /// Plan the blank notice.
    pub fn empty() -> Self {
        Self {
            mode: RunMode::Empty,
            tracking_codes: Vec::new(),
            force_offline: true,
        }
    }

    /// Plan one notice per code.
    ///
    /// Each argument may hold several `;`-separated codes; repeated codes keep
    /// only their first position. Without any code a single notice without
    /// tracking data is planned and lookups are skipped.
    pub fn for_codes<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let tracking_codes: Vec<String> = args
            .into_iter()
            .flat_map(|arg| {
                arg.as_ref()
                    .split(';')
                    .map(str::trim)
                    .filter(|code| !code.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|code| seen.insert(code.clone()))
            .collect();

        if tracking_codes.is_empty() {
            return Self {
                mode: RunMode::Codes,
                tracking_codes: vec![String::new()],
                force_offline: true,
            };
        }

        Self {
            mode: RunMode::Codes,
            tracking_codes,
            force_offline: false,
        }
    }

    /// Plan from the `[run]` section plus extra command-line codes.
    pub fn from_config(run: &RunConfig, extra_codes: &[String]) -> Self {
        if run.empty {
            return Self::empty();
        }

        let mut plan = Self::for_codes(run.tracking_codes.iter().chain(extra_codes));
        plan.force_offline |= run.offline;
        plan
    }
}

/// One notice to generate. Owned by a single worker.
#[derive(Debug, Clone)]
pub struct TrackingJob {
    /// Tracking code; empty when the notice has none.
    pub tracking_code: String,
    /// Private copy of the session fields.
    pub fields: FormFieldMap,
    pub output: PathBuf,
    /// Whether the resolver and barcode encoder are used.
    pub lookup: bool,
}

/// File name of the notice for `tracking_code`.
///
/// Notices without a code are told apart by the planning timestamp.
pub fn notice_file_name(mode: RunMode, tracking_code: &str, epoch_millis: i64) -> String {
    match mode {
        RunMode::Empty => format!("{}.odg", NOTICE_STEM),
        RunMode::Codes if tracking_code.is_empty() => format!(
            "{} (без кода отслеживания @{}).odg",
            NOTICE_STEM, epoch_millis
        ),
        RunMode::Codes => format!("{} {}.odg", NOTICE_STEM, tracking_code),
    }
}

/// Result of one job.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub tracking_code: String,
    pub output: PathBuf,
    /// How the lookup went; `None` when no lookup was made.
    pub resolution: Option<ResolutionStatus>,
    /// Assembly report, or the error text.
    pub result: Result<AssemblyReport, String>,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// Totals for a run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// The shutdown wait expired with workers still running.
    pub timed_out: bool,
    pub outcomes: Vec<JobOutcome>,
}

impl RunSummary {
    /// Jobs that never reported back.
    pub fn unfinished(&self) -> usize {
        self.submitted.saturating_sub(self.succeeded + self.failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_split_and_trimmed() {
        let plan = RunPlan::for_codes(["A1; B2", "C3;;", " "]);
        assert_eq!(plan.mode, RunMode::Codes);
        assert_eq!(plan.tracking_codes, vec!["A1", "B2", "C3"]);
        assert!(!plan.force_offline);
    }

    #[test]
    fn test_duplicate_codes_planned_once() {
        let plan = RunPlan::for_codes(["A1;A1;A1"]);
        assert_eq!(plan.tracking_codes, vec!["A1"]);

        let plan = RunPlan::for_codes(["B2;A1", " A1 ;C3", "B2"]);
        assert_eq!(plan.tracking_codes, vec!["B2", "A1", "C3"]);
    }

    #[test]
    fn test_no_codes_plans_one_offline_job() {
        let plan = RunPlan::for_codes(Vec::<String>::new());
        assert_eq!(plan.tracking_codes, vec![String::new()]);
        assert!(plan.force_offline);
    }

    #[test]
    fn test_from_config() {
        let mut run = RunConfig {
            tracking_codes: vec!["A1".to_string()],
            offline: true,
            ..RunConfig::default()
        };
        let plan = RunPlan::from_config(&run, &["B2;C3".to_string()]);
        assert_eq!(plan.tracking_codes, vec!["A1", "B2", "C3"]);
        assert!(plan.force_offline);

        run.empty = true;
        assert_eq!(RunPlan::from_config(&run, &[]), RunPlan::empty());
    }

    #[test]
    fn test_notice_file_names() {
        assert_eq!(
            notice_file_name(RunMode::Codes, "80085412345678", 0),
            "Извещение 80085412345678.odg"
        );
        assert_eq!(
            notice_file_name(RunMode::Codes, "", 1_600_000_000_000),
            "Извещение (без кода отслеживания @1600000000000).odg"
        );
        assert_eq!(notice_file_name(RunMode::Empty, "", 5), "Извещение.odg");
    }

    #[test]
    fn test_summary_unfinished() {
        let summary = RunSummary {
            submitted: 5,
            succeeded: 2,
            failed: 1,
            timed_out: true,
            outcomes: Vec::new(),
        };
        assert_eq!(summary.unfinished(), 2);
    }
}
