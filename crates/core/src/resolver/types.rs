//! Types shared by resolver implementations.

use std::fmt;

use reqwest::header::HeaderMap;
use reqwest::Url;

use crate::form::FormFieldMap;

/// Lifecycle of a resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// Bootstrap not started yet.
    Uninitialized,
    /// Bootstrap running in the background.
    Initializing,
    /// Session established, lookups go to the network.
    Ready,
    /// Lookups are short-circuited for the rest of the process.
    Offline,
}

/// Session negotiated during bootstrap. Written once, then only read.
#[derive(Debug, Clone)]
pub struct ResolverSession {
    /// Lookup endpoint discovered in the landing page.
    pub endpoint: Url,
    /// Headers carried by every lookup (session cookies).
    pub headers: HeaderMap,
}

/// Why a lookup did not touch the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyCode,
    Offline,
    /// The bootstrap has not produced a session.
    NotReady,
}

/// How far a lookup got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStatus {
    Skipped(SkipReason),
    /// The shipment has no tracking history yet.
    NoHistory,
    /// The shipment has not reached the pickup office.
    NotArrived,
    /// The server omitted the notice form parameters.
    MissingDetailForm,
    /// The server omitted the post office summary.
    MissingOfficeInfo,
    Complete,
    Failed(String),
}

impl ResolutionStatus {
    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionStatus::Skipped(_) => "skipped",
            ResolutionStatus::NoHistory => "no_history",
            ResolutionStatus::NotArrived => "not_arrived",
            ResolutionStatus::MissingDetailForm => "missing_detail_form",
            ResolutionStatus::MissingOfficeInfo => "missing_office_info",
            ResolutionStatus::Complete => "complete",
            ResolutionStatus::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionStatus::Skipped(SkipReason::EmptyCode) => f.write_str("no tracking code"),
            ResolutionStatus::Skipped(SkipReason::Offline) => f.write_str("offline"),
            ResolutionStatus::Skipped(SkipReason::NotReady) => f.write_str("session not ready"),
            ResolutionStatus::NoHistory => f.write_str("no tracking history yet"),
            ResolutionStatus::NotArrived => f.write_str("not yet arrived at the pickup office"),
            ResolutionStatus::MissingDetailForm => f.write_str("server omitted shipment details"),
            ResolutionStatus::MissingOfficeInfo => f.write_str("server omitted post office info"),
            ResolutionStatus::Complete => f.write_str("complete"),
            ResolutionStatus::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}

/// Result of a lookup: the remote fields and how they were obtained.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub fields: FormFieldMap,
    pub status: ResolutionStatus,
}

impl Resolution {
    /// All-default fields for a lookup that never went to the network.
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            fields: FormFieldMap::remote(),
            status: ResolutionStatus::Skipped(reason),
        }
    }
}
