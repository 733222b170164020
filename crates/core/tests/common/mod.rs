//! In-process stand-in for the tracking service.
//!
//! Serves a landing page carrying a session cookie and the lookup endpoint,
//! and a multipart lookup endpoint answering with a fixed record or a
//! configured raw reply.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use form22_core::resolver::ResolverConfig;

/// Landing page with the endpoint published the way the real page does.
const LANDING_PAGE: &str = r#"<html><script>window.__CONFIG__={locale:"ru",getTrackingsByBarcodesUrl:"/api/tracking/by-barcodes",x:1}</script></html>"#;

#[derive(Clone, Default)]
pub struct FakeTracking {
    pub landing_calls: Arc<AtomicUsize>,
    pub lookup_calls: Arc<AtomicUsize>,
    /// Barcodes received by the lookup endpoint.
    pub barcodes: Arc<Mutex<Vec<String>>>,
    /// Cookie headers received by the lookup endpoint.
    pub cookies: Arc<Mutex<Vec<String>>>,
    record: Arc<Mutex<Value>>,
    /// Verbatim reply sent instead of the record.
    raw_reply: Arc<Mutex<Option<(StatusCode, String)>>>,
}

impl FakeTracking {
    pub fn landing_count(&self) -> usize {
        self.landing_calls.load(Ordering::SeqCst)
    }

    pub fn lookup_count(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn set_record(&self, record: Value) {
        *self.record.lock().unwrap() = record;
    }

    /// Answer lookups with `status` and a plain-text `body`.
    pub fn set_raw_reply(&self, status: StatusCode, body: &str) {
        *self.raw_reply.lock().unwrap() = Some((status, body.to_string()));
    }
}

/// A running fake service.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: FakeTracking,
}

impl TestServer {
    /// Start the service on an ephemeral port with an arrived parcel.
    pub async fn start() -> Self {
        let state = FakeTracking::default();
        state.set_record(arrived_record());

        let app = Router::new()
            .route("/tracking", get(landing))
            .route("/broken", get(broken))
            .route("/no-marker", get(no_marker))
            .route("/api/tracking/by-barcodes", post(lookup))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Resolver configuration bootstrapping from `path`.
    pub fn resolver_config(&self, path: &str) -> ResolverConfig {
        ResolverConfig {
            timeout_secs: 5,
            ..ResolverConfig::default().with_landing_url(self.url(path))
        }
    }
}

async fn landing(State(state): State<FakeTracking>) -> impl IntoResponse {
    state.landing_calls.fetch_add(1, Ordering::SeqCst);
    (
        [(header::SET_COOKIE, "SESSION=abc123; Path=/")],
        Html(LANDING_PAGE),
    )
}

async fn broken(State(state): State<FakeTracking>) -> impl IntoResponse {
    state.landing_calls.fetch_add(1, Ordering::SeqCst);
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance")
}

async fn no_marker(State(state): State<FakeTracking>) -> impl IntoResponse {
    state.landing_calls.fetch_add(1, Ordering::SeqCst);
    Html("<html>nothing here</html>")
}

async fn lookup(
    State(state): State<FakeTracking>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    state.lookup_calls.fetch_add(1, Ordering::SeqCst);

    if let Some(cookie) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        state.cookies.lock().unwrap().push(cookie.to_string());
    }
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("barcodes") {
            if let Ok(code) = field.text().await {
                state.barcodes.lock().unwrap().push(code);
            }
        }
    }

    if let Some((status, body)) = state.raw_reply.lock().unwrap().clone() {
        return (status, body).into_response();
    }
    let record = state.record.lock().unwrap().clone();
    Json(record).into_response()
}

/// Record of a parcel waiting at the pickup office.
pub fn arrived_record() -> Value {
    json!({
        "response": [{
            "trackingItem": {
                "trackingHistoryItemList": [
                    { "operationType": 1, "operationAttr": 1 },
                    { "operationType": 8, "operationAttr": 2 }
                ]
            },
            "formF22Params": {
                "senderAddress": "Москва, 101000",
                "MailTypeText": "Посылка",
                "MailCtgText": "Обыкновенная",
                "postmarkText": "",
                "endStorageDate": 0,
                "MailRankText": "Без разряда",
                "WeightGr": 2000,
                "SummInsured": 0,
                "SummCashOnDelivery": 99.9,
                "ReturningRate": null,
                "CustomDuty": 0
            },
            "officeSummary": {
                "addressSource": "Санкт-Петербург, ул. Ленина, 1",
                "workingSchedule": ["пн-пт 08:00-20:00"],
                "phones": ["+7 800 100-00-00"]
            }
        }]
    })
}
