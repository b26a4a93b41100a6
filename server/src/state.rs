use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Semaphore;
use tracing::warn;

use crate::config::{
    admin_credentials, rankings_api_key, rankings_api_url, upstream_connect_timeout,
    upstream_http_timeout,
};
use crate::services::rankings::UpstreamConfig;
use crate::storage::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub http_client: reqwest::Client,
    pub upstream: Arc<UpstreamConfig>,
    /// Single-flight guard for snapshot capture: one permit, never queued.
    pub capture_permit: Arc<Semaphore>,
    pub admin: Option<(String, String)>,
    pub observability: Arc<ObservabilityCounters>,
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    leaderboard_requests_total: AtomicU64,
    upstream_errors_total: AtomicU64,
    snapshot_captures_total: AtomicU64,
    capture_conflicts_total: AtomicU64,
    settings_writes_total: AtomicU64,
    settings_rejections_total: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct ObservabilitySnapshot {
    pub leaderboard_requests_total: u64,
    pub upstream_errors_total: u64,
    pub snapshot_captures_total: u64,
    pub capture_conflicts_total: u64,
    pub settings_writes_total: u64,
    pub settings_rejections_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            leaderboard_requests_total: self.leaderboard_requests_total.load(Ordering::Relaxed),
            upstream_errors_total: self.upstream_errors_total.load(Ordering::Relaxed),
            snapshot_captures_total: self.snapshot_captures_total.load(Ordering::Relaxed),
            capture_conflicts_total: self.capture_conflicts_total.load(Ordering::Relaxed),
            settings_writes_total: self.settings_writes_total.load(Ordering::Relaxed),
            settings_rejections_total: self.settings_rejections_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_leaderboard_request(&self) {
        self.leaderboard_requests_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upstream_error(&self) {
        self.upstream_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_snapshot_capture(&self) {
        self.snapshot_captures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_capture_conflict(&self) {
        self.capture_conflicts_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_settings_write(&self) {
        self.settings_writes_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_settings_rejection(&self) {
        self.settings_rejections_total.fetch_add(1, Ordering::Relaxed);
    }
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let upstream = UpstreamConfig {
            base_url: rankings_api_url(),
            api_key: rankings_api_key(),
        };
        Self::with_upstream(store, upstream, admin_credentials())
    }

    pub fn with_upstream(
        store: Arc<dyn DocumentStore>,
        upstream: UpstreamConfig,
        admin: Option<(String, String)>,
    ) -> Self {
        let request_timeout = upstream_http_timeout();
        let connect_timeout = upstream_connect_timeout();
        let http_client = reqwest::Client::builder()
            .user_agent("wagerboard/0.1")
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .or_else(|e| {
                warn!(
                    error = %e,
                    "failed to build configured HTTP client, retrying without custom user-agent"
                );
                reqwest::Client::builder()
                    .timeout(request_timeout)
                    .connect_timeout(connect_timeout)
                    .build()
            })
            .unwrap_or_else(|e| {
                panic!("failed to build timeout-configured HTTP client: {e}");
            });
        Self {
            store,
            http_client,
            upstream: Arc::new(upstream),
            capture_permit: Arc::new(Semaphore::new(1)),
            admin,
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }
}
