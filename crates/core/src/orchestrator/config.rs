//! Orchestrator configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the job orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Number of notices generated concurrently.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// How long to wait for in-flight notices before giving up (seconds).
    /// Workers still running are left alone.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

fn default_max_workers() -> usize {
    3
}

fn default_shutdown_timeout() -> u64 {
    60
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl OrchestratorConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
