//! Job orchestrator implementation.
//!
//! Bootstraps the resolver once, then generates every notice of a run on a
//! bounded pool of tokio tasks. Archive writing runs on the blocking pool.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::assembler::{AssemblyReport, TemplateAssembler};
use crate::barcode::BarcodeEncoder;
use crate::form::{FormField, FormFieldMap};
use crate::resolver::TrackingResolver;

use super::config::OrchestratorConfig;
use super::types::{
    notice_file_name, JobError, JobOutcome, RunMode, RunPlan, RunSummary, TrackingJob,
};

/// Shared collaborators handed to every worker.
#[derive(Clone)]
struct Workers {
    resolver: Arc<dyn TrackingResolver>,
    encoder: Arc<dyn BarcodeEncoder>,
    assembler: Arc<TemplateAssembler>,
}

/// Drives a run: resolver bootstrap, fan-out, bounded shutdown.
pub struct JobOrchestrator {
    config: OrchestratorConfig,
    output_dir: PathBuf,
    workers: Workers,
}

impl JobOrchestrator {
    /// Create a new orchestrator writing notices into `output_dir`.
    pub fn new(
        config: OrchestratorConfig,
        resolver: Arc<dyn TrackingResolver>,
        encoder: Arc<dyn BarcodeEncoder>,
        assembler: Arc<TemplateAssembler>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            output_dir: output_dir.into(),
            workers: Workers {
                resolver,
                encoder,
                assembler,
            },
        }
    }

    /// Build the jobs of `plan`, each with its own copy of `session`.
    pub fn plan_jobs(&self, plan: &RunPlan, session: &FormFieldMap) -> Vec<TrackingJob> {
        if plan.mode == RunMode::Empty {
            return vec![TrackingJob {
                tracking_code: String::new(),
                fields: FormFieldMap::template(),
                output: self
                    .output_dir
                    .join(notice_file_name(RunMode::Empty, "", 0)),
                lookup: false,
            }];
        }

        let planned_at = Utc::now().timestamp_millis();
        plan.tracking_codes
            .iter()
            .map(|code| {
                let mut fields = session.clone();
                fields.set(FormField::TrackingCode, code.as_str());
                TrackingJob {
                    tracking_code: code.clone(),
                    fields,
                    output: self
                        .output_dir
                        .join(notice_file_name(RunMode::Codes, code, planned_at)),
                    lookup: !code.is_empty(),
                }
            })
            .collect()
    }

    /// Run every job of `plan` and wait (bounded) for them to finish.
    pub async fn run(&self, plan: RunPlan, session: FormFieldMap) -> RunSummary {
        let resolver = &self.workers.resolver;
        if plan.force_offline {
            resolver.force_offline();
        }
        if plan.mode == RunMode::Codes {
            resolver.begin_initialization();
            resolver.wait_until_ready().await;
            debug!(resolver = resolver.name(), state = ?resolver.state(), "Resolver settled");
        }

        let jobs = self.plan_jobs(&plan, &session);
        let submitted = jobs.len();
        info!(
            jobs = submitted,
            workers = self.config.max_workers,
            "Generating notices"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_workers.max(1)));
        let (outcome_tx, mut outcome_rx) = mpsc::channel(submitted.max(1));

        let handles: Vec<JoinHandle<()>> = jobs
            .into_iter()
            .map(|job| {
                let semaphore = Arc::clone(&semaphore);
                let workers = self.workers.clone();
                let outcome_tx = outcome_tx.clone();

                tokio::spawn(async move {
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        warn!(tracking_code = %job.tracking_code, "Worker pool closed, job dropped");
                        return;
                    };
                    let outcome = process_job(job, workers).await;
                    let _ = outcome_tx.send(outcome).await;
                })
            })
            .collect();
        drop(outcome_tx);

        let timed_out = !self.shutdown(handles).await;

        let mut summary = RunSummary {
            submitted,
            timed_out,
            ..RunSummary::default()
        };
        while let Ok(outcome) = outcome_rx.try_recv() {
            if outcome.is_success() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
            summary.outcomes.push(outcome);
        }

        info!(
            submitted = summary.submitted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            timed_out = summary.timed_out,
            "Run finished"
        );
        summary
    }

    /// Wait for the workers up to the configured ceiling.
    ///
    /// Returns false on timeout; workers still running are detached.
    async fn shutdown(&self, handles: Vec<JoinHandle<()>>) -> bool {
        let timeout = self.config.shutdown_timeout();
        debug!(workers = handles.len(), ?timeout, "Waiting for workers");

        match tokio::time::timeout(timeout, join_all(handles)).await {
            Ok(results) => {
                for result in results {
                    if let Err(e) = result {
                        error!(error = %e, "Worker task failed");
                    }
                }
                true
            }
            Err(_) => {
                warn!(?timeout, "Workers still running after shutdown timeout, not waiting");
                false
            }
        }
    }
}

/// Generate one notice.
async fn process_job(job: TrackingJob, workers: Workers) -> JobOutcome {
    let TrackingJob {
        tracking_code,
        mut fields,
        output,
        lookup,
    } = job;

    info!(tracking_code = %tracking_code, output = %output.display(), "Generating notice");

    let resolution = if lookup {
        let resolution = workers.resolver.fetch_detailed(&tracking_code).await;
        fields.overlay(&resolution.fields);
        Some(resolution.status)
    } else {
        None
    };

    let result = write_notice(&tracking_code, fields, &output, lookup, &workers).await;
    if let Err(e) = &result {
        error!(tracking_code = %tracking_code, error = %e, "Notice not generated");
    }

    JobOutcome {
        tracking_code,
        output,
        resolution,
        result: result.map_err(|e| e.to_string()),
    }
}

async fn write_notice(
    tracking_code: &str,
    fields: FormFieldMap,
    output: &std::path::Path,
    with_barcode: bool,
    workers: &Workers,
) -> Result<AssemblyReport, JobError> {
    let encoder = Arc::clone(&workers.encoder);
    let assembler = Arc::clone(&workers.assembler);
    let code = tracking_code.to_string();
    let output = output.to_path_buf();

    let report = tokio::task::spawn_blocking(move || {
        let barcode = with_barcode.then(|| encoder.encode(&code));
        assembler.assemble(&fields, barcode.as_deref(), &output)
    })
    .await??;

    Ok(report)
}
