//! Remote tracking resolver.
//!
//! Resolves shipment data for a tracking code from the Russian Post tracking
//! service. The resolver bootstraps a session once (cookies plus the lookup
//! endpoint, which is only published inside the landing page), then answers
//! per-code lookups by parsing the service's loosely structured JSON into a
//! [`FormFieldMap`](crate::form::FormFieldMap).
//!
//! Every failure degrades instead of propagating:
//!
//! - a failed bootstrap switches the resolver to a sticky offline mode
//! - a failed lookup returns whatever fields were filled so far
//!
//! # Example
//!
//! ```ignore
//! use form22_core::resolver::{PochtaResolver, ResolverConfig, TrackingResolver};
//!
//! let resolver = PochtaResolver::new(ResolverConfig::default(), false)?;
//! resolver.begin_initialization();
//! resolver.wait_until_ready().await;
//!
//! let fields = resolver.fetch("80085412345678").await;
//! ```

mod config;
mod json;
mod pochta;
mod record;
mod types;

pub use config::ResolverConfig;
pub use json::JsonLookup;
pub use pochta::{discover_endpoint, PochtaResolver};
pub use record::{
    populate_fields, ARRIVED_OPERATION_ATTR, ARRIVED_OPERATION_TYPE,
    RETURN_FEE_SOURCE_FIELD_UNVERIFIED,
};
pub use types::{Resolution, ResolutionStatus, ResolverSession, ResolverState, SkipReason};

use async_trait::async_trait;
use thiserror::Error;

use crate::form::FormFieldMap;

/// Errors that can occur while talking to the tracking service.
///
/// These never escape the resolver's public operations; they are logged and
/// recorded as the reason for offline mode or a failed lookup.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// The landing page did not contain the endpoint marker.
    #[error("Tracking endpoint not found in landing page")]
    EndpointNotFound,

    /// The discovered endpoint is not a usable URL.
    #[error("Invalid tracking endpoint: {0}")]
    InvalidEndpoint(String),

    /// A header value could not be built.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// Response body is not JSON.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A source of remote shipment data.
#[async_trait]
pub trait TrackingResolver: Send + Sync {
    /// Returns the name of this resolver implementation.
    fn name(&self) -> &str;

    /// Start the one-time session bootstrap in the background.
    ///
    /// Does nothing when offline or when the bootstrap was already started.
    fn begin_initialization(&self);

    /// Wait for the bootstrap to finish.
    ///
    /// An interrupted bootstrap switches the resolver offline. Never fails.
    async fn wait_until_ready(&self);

    /// Look up `tracking_code`, reporting how far the lookup got.
    async fn fetch_detailed(&self, tracking_code: &str) -> Resolution;

    /// Look up `tracking_code`. The map always holds every remote field.
    async fn fetch(&self, tracking_code: &str) -> FormFieldMap {
        self.fetch_detailed(tracking_code).await.fields
    }

    /// Current lifecycle state.
    fn state(&self) -> ResolverState;

    /// Whether lookups are short-circuited.
    fn is_offline(&self) -> bool {
        self.state() == ResolverState::Offline
    }

    /// Permanently short-circuit future lookups.
    fn force_offline(&self);
}
