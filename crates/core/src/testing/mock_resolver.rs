//! Mock tracking resolver for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::form::FormFieldMap;
use crate::resolver::{Resolution, ResolutionStatus, ResolverState, SkipReason, TrackingResolver};

/// Mock implementation of the TrackingResolver trait.
///
/// Provides controllable behavior for testing:
/// - Record every looked-up tracking code
/// - Return a configured field map and status
/// - Simulate offline mode and slow lookups
///
/// # Example
///
/// ```rust,ignore
/// use form22_core::testing::MockResolver;
///
/// let resolver = MockResolver::new();
/// let fields = resolver.fetch("80085412345678").await;
///
/// assert_eq!(resolver.fetch_count().await, 1);
/// ```
#[derive(Debug)]
pub struct MockResolver {
    /// Tracking codes passed to fetch, in call order.
    fetched: Arc<RwLock<Vec<String>>>,
    /// Fields and status returned by a lookup.
    response: Arc<RwLock<Resolution>>,
    offline: AtomicBool,
    ready: AtomicBool,
    initializations: AtomicUsize,
    waits: AtomicUsize,
    /// Simulated lookup duration in milliseconds.
    fetch_delay_ms: AtomicU64,
}

impl Default for MockResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockResolver {
    /// Create a mock that answers every lookup with default fields.
    pub fn new() -> Self {
        Self {
            fetched: Arc::new(RwLock::new(Vec::new())),
            response: Arc::new(RwLock::new(Resolution {
                fields: FormFieldMap::remote(),
                status: ResolutionStatus::NoHistory,
            })),
            offline: AtomicBool::new(false),
            ready: AtomicBool::new(false),
            initializations: AtomicUsize::new(0),
            waits: AtomicUsize::new(0),
            fetch_delay_ms: AtomicU64::new(0),
        }
    }

    /// Create a mock that starts offline.
    pub fn offline() -> Self {
        let mock = Self::new();
        mock.offline.store(true, Ordering::SeqCst);
        mock
    }

    /// Configure what every lookup returns.
    pub async fn set_response(&self, fields: FormFieldMap, status: ResolutionStatus) {
        *self.response.write().await = Resolution { fields, status };
    }

    /// Set the simulated lookup duration.
    pub fn set_fetch_delay(&self, delay: Duration) {
        self.fetch_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Tracking codes passed to fetch so far.
    pub async fn fetched_codes(&self) -> Vec<String> {
        self.fetched.read().await.clone()
    }

    /// Number of fetch calls so far.
    pub async fn fetch_count(&self) -> usize {
        self.fetched.read().await.len()
    }

    /// Number of begin_initialization calls.
    pub fn initialization_count(&self) -> usize {
        self.initializations.load(Ordering::SeqCst)
    }

    /// Number of wait_until_ready calls.
    pub fn wait_count(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrackingResolver for MockResolver {
    fn name(&self) -> &str {
        "mock"
    }

    fn begin_initialization(&self) {
        self.initializations.fetch_add(1, Ordering::SeqCst);
    }

    async fn wait_until_ready(&self) {
        self.waits.fetch_add(1, Ordering::SeqCst);
        if !self.offline.load(Ordering::SeqCst) {
            self.ready.store(true, Ordering::SeqCst);
        }
    }

    async fn fetch_detailed(&self, tracking_code: &str) -> Resolution {
        self.fetched.write().await.push(tracking_code.to_string());

        let delay = self.fetch_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if tracking_code.is_empty() {
            return Resolution::skipped(SkipReason::EmptyCode);
        }
        if self.offline.load(Ordering::SeqCst) {
            return Resolution::skipped(SkipReason::Offline);
        }
        self.response.read().await.clone()
    }

    fn state(&self) -> ResolverState {
        if self.offline.load(Ordering::SeqCst) {
            ResolverState::Offline
        } else if self.ready.load(Ordering::SeqCst) {
            ResolverState::Ready
        } else if self.initializations.load(Ordering::SeqCst) > 0 {
            ResolverState::Initializing
        } else {
            ResolverState::Uninitialized
        }
    }

    fn force_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}
