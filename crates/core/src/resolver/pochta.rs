//! Russian Post tracking resolver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use reqwest::{multipart, Client, Url};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::form::FormFieldMap;
use crate::metrics::{BOOTSTRAP_TOTAL, FETCH_TOTAL};

use super::config::ResolverConfig;
use super::record::populate_fields;
use super::types::{Resolution, ResolutionStatus, ResolverSession, ResolverState, SkipReason};
use super::{ResolverError, TrackingResolver};

const ACCEPT_LANDING: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9";
const ACCEPT_LANGUAGE_RU: &str = "ru-RU,ru;q=0.8,en-US;q=0.5,en;q=0.3";

/// How the bootstrap task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BootstrapExit {
    Finished,
    Interrupted,
}

type BootstrapHandle = Shared<BoxFuture<'static, BootstrapExit>>;

/// State shared between the resolver and its bootstrap task.
#[derive(Default)]
struct SessionState {
    session: OnceLock<ResolverSession>,
    offline: AtomicBool,
    started: AtomicBool,
    failure: Mutex<Option<String>>,
    bootstrap: Mutex<Option<BootstrapHandle>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SessionState {
    fn go_offline(&self, reason: String) {
        self.offline.store(true, Ordering::SeqCst);
        let mut failure = lock(&self.failure);
        if failure.is_none() {
            *failure = Some(reason);
        }
    }
}

/// Resolver backed by the pochta.ru tracking page.
pub struct PochtaResolver {
    client: Client,
    config: ResolverConfig,
    state: Arc<SessionState>,
}

impl PochtaResolver {
    /// Create a resolver. With `offline` set, no request is ever made.
    pub fn new(config: ResolverConfig, offline: bool) -> Result<Self, ResolverError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let state = SessionState::default();
        if offline {
            state.go_offline("offline mode requested".to_string());
        }

        Ok(Self {
            client,
            config,
            state: Arc::new(state),
        })
    }

    /// The established session, if the bootstrap succeeded.
    pub fn session(&self) -> Option<&ResolverSession> {
        self.state.session.get()
    }

    /// Why the resolver went offline, if it did.
    pub fn failure(&self) -> Option<String> {
        lock(&self.state.failure).clone()
    }

    /// Request the tracking record for `tracking_code` and return the raw body.
    async fn request(
        &self,
        session: &ResolverSession,
        tracking_code: &str,
    ) -> Result<String, ResolverError> {
        let form = multipart::Form::new().text("barcodes", tracking_code.to_string());

        let response = self
            .client
            .post(session.endpoint.clone())
            .headers(tracking_headers(&self.config.user_agent)?)
            .headers(session.headers.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolverError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl TrackingResolver for PochtaResolver {
    fn name(&self) -> &str {
        "pochta"
    }

    fn begin_initialization(&self) {
        if self.state.offline.load(Ordering::SeqCst) {
            debug!("Resolver offline, skipping bootstrap");
            return;
        }
        // The handle is published under the same lock that claims the start.
        let mut pending = lock(&self.state.bootstrap);
        if pending.is_some() {
            debug!("Resolver bootstrap already started");
            return;
        }

        let client = self.client.clone();
        let config = self.config.clone();
        let state = Arc::clone(&self.state);

        let task = tokio::spawn(async move {
            info!(url = %config.landing_url, "Bootstrapping tracking session");
            match bootstrap(&client, &config).await {
                Ok(session) => {
                    info!(endpoint = %session.endpoint, "Tracking session ready");
                    // Only this task ever writes the session.
                    let _ = state.session.set(session);
                    BOOTSTRAP_TOTAL.with_label_values(&["ready"]).inc();
                }
                Err(e) => {
                    error!(error = %e, "Bootstrap failed, switching to offline mode");
                    state.go_offline(e.to_string());
                    BOOTSTRAP_TOTAL.with_label_values(&["failed"]).inc();
                }
            }
        });

        *pending = Some(watch_bootstrap(task));
        self.state.started.store(true, Ordering::SeqCst);
    }

    async fn wait_until_ready(&self) {
        if self.state.offline.load(Ordering::SeqCst) {
            return;
        }

        let pending = lock(&self.state.bootstrap).clone();
        let Some(pending) = pending else {
            debug!("Bootstrap was never started");
            return;
        };

        if pending.await == BootstrapExit::Interrupted {
            error!("Waiting for bootstrap interrupted, switching to offline mode");
            self.state
                .go_offline("bootstrap interrupted".to_string());
            BOOTSTRAP_TOTAL.with_label_values(&["interrupted"]).inc();
        }
    }

    async fn fetch_detailed(&self, tracking_code: &str) -> Resolution {
        let resolution = if tracking_code.is_empty() {
            Resolution::skipped(SkipReason::EmptyCode)
        } else if self.state.offline.load(Ordering::SeqCst) {
            Resolution::skipped(SkipReason::Offline)
        } else if let Some(session) = self.state.session.get() {
            self.lookup(session, tracking_code).await
        } else {
            warn!(
                tracking_code = tracking_code,
                "Tracking session not established, using defaults"
            );
            Resolution::skipped(SkipReason::NotReady)
        };

        FETCH_TOTAL
            .with_label_values(&[resolution.status.label()])
            .inc();
        resolution
    }

    fn state(&self) -> ResolverState {
        if self.state.offline.load(Ordering::SeqCst) {
            ResolverState::Offline
        } else if self.state.session.get().is_some() {
            ResolverState::Ready
        } else if self.state.started.load(Ordering::SeqCst) {
            ResolverState::Initializing
        } else {
            ResolverState::Uninitialized
        }
    }

    fn force_offline(&self) {
        info!("Resolver forced offline");
        self.state.go_offline("forced offline".to_string());
    }
}

impl PochtaResolver {
    async fn lookup(&self, session: &ResolverSession, tracking_code: &str) -> Resolution {
        info!(tracking_code = tracking_code, "Requesting shipment data");
        let mut fields = FormFieldMap::remote();

        let body = match self.request(session, tracking_code).await {
            Ok(body) => body,
            Err(e) => {
                error!(tracking_code = tracking_code, error = %e, "Tracking request failed");
                return Resolution {
                    fields,
                    status: ResolutionStatus::Failed(e.to_string()),
                };
            }
        };

        let status = match serde_json::from_str(&body) {
            Ok(json) => populate_fields(&json, &mut fields),
            Err(e) => {
                let e = ResolverError::from(e);
                error!(tracking_code = tracking_code, error = %e, body = %body, "Malformed tracking response");
                ResolutionStatus::Failed(e.to_string())
            }
        };

        match &status {
            ResolutionStatus::Complete => {
                info!(tracking_code = tracking_code, "Shipment data received")
            }
            ResolutionStatus::Failed(_) => {}
            other => warn!(tracking_code = tracking_code, status = %other, "Shipment data incomplete"),
        }

        Resolution { fields, status }
    }
}

/// Wrap the bootstrap task so any number of waiters can await its exit.
fn watch_bootstrap(task: JoinHandle<()>) -> BootstrapHandle {
    async move {
        match task.await {
            Ok(()) => BootstrapExit::Finished,
            Err(e) => {
                warn!(error = %e, "Bootstrap task did not complete");
                BootstrapExit::Interrupted
            }
        }
    }
    .boxed()
    .shared()
}

/// Fetch the landing page, collect its cookies and discover the endpoint.
async fn bootstrap(
    client: &Client,
    config: &ResolverConfig,
) -> Result<ResolverSession, ResolverError> {
    let response = client
        .get(&config.landing_url)
        .headers(landing_headers(&config.user_agent)?)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ResolverError::Status(status.as_u16()));
    }

    let cookies: Vec<String> = response
        .cookies()
        .map(|c| format!("{}={}", c.name(), c.value()))
        .collect();
    let base = response.url().clone();
    let body = response.text().await?;

    debug!(cookies = cookies.len(), "Extracting tracking endpoint");
    let endpoint = discover_endpoint(&body, &config.endpoint_marker, &base)?;

    let mut headers = HeaderMap::new();
    let cookie = merge_cookies(cookies, &config.extra_cookie);
    if !cookie.is_empty() {
        headers.insert(COOKIE, header_value(&cookie)?);
    }

    Ok(ResolverSession { endpoint, headers })
}

/// Find the quoted URL following `marker` in `body`.
///
/// Escaped slashes are unescaped and relative URLs resolved against `base`.
pub fn discover_endpoint(body: &str, marker: &str, base: &Url) -> Result<Url, ResolverError> {
    let start = body
        .find(marker)
        .ok_or(ResolverError::EndpointNotFound)?
        + marker.len();
    let rest = &body[start..];
    let end = rest.find('"').ok_or(ResolverError::EndpointNotFound)?;

    let raw = rest[..end].replace("\\u002F", "/").replace("\\/", "/");
    if raw.trim().is_empty() {
        return Err(ResolverError::InvalidEndpoint("empty URL".to_string()));
    }

    base.join(raw.trim())
        .map_err(|e| ResolverError::InvalidEndpoint(format!("{}: {}", raw, e)))
}

fn merge_cookies(mut cookies: Vec<String>, extra: &str) -> String {
    let extra = extra.trim();
    if !extra.is_empty() {
        cookies.push(extra.to_string());
    }
    cookies.join("; ")
}

fn header_value(value: &str) -> Result<HeaderValue, ResolverError> {
    HeaderValue::from_str(value).map_err(|e| ResolverError::InvalidHeader(e.to_string()))
}

fn browser_headers(accept: &'static str, user_agent: &str) -> Result<HeaderMap, ResolverError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(accept));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_RU));
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("document"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("navigate"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("none"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-user"),
        HeaderValue::from_static("?1"),
    );
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(USER_AGENT, header_value(user_agent)?);
    Ok(headers)
}

fn landing_headers(user_agent: &str) -> Result<HeaderMap, ResolverError> {
    browser_headers(ACCEPT_LANDING, user_agent)
}

fn tracking_headers(user_agent: &str) -> Result<HeaderMap, ResolverError> {
    browser_headers("*/*", user_agent)
}
