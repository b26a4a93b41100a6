use std::fmt::Write as _;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::IntoResponse;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use wagerboard_shared::{
    LeaderboardEntry, Period, RangeWindow, Settings, Snapshot, SnapshotSummary, payout_for,
    resolve_range,
};

use crate::archive;
use crate::auth::require_admin;
use crate::error::ApiError;
use crate::services::rankings;
use crate::settings_store::{self, SettingsUpdate};
use crate::state::{AppState, ObservabilitySnapshot};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (storage_ok, snapshot_count) = match state.store.load_snapshots().await {
        Ok(documents) => (true, documents.len()),
        Err(_) => (false, 0),
    };
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "snapshots": snapshot_count,
        "storage_ok": storage_ok,
        "upstream_configured": state.upstream.api_key.is_some(),
        "observability": {
            "leaderboard_requests_total": observability.leaderboard_requests_total,
            "upstream_errors_total": observability.upstream_errors_total,
            "snapshot_captures_total": observability.snapshot_captures_total,
            "capture_conflicts_total": observability.capture_conflicts_total,
            "settings_writes_total": observability.settings_writes_total,
            "settings_rejections_total": observability.settings_rejections_total,
        }
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let (storage_ok, snapshot_count) = match state.store.load_snapshots().await {
        Ok(documents) => (true, documents.len()),
        Err(_) => (false, 0),
    };
    let body = render_prometheus_metrics(snapshot_count, storage_ok, state.observability.snapshot());
    (
        [
            (header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
}

fn render_prometheus_metrics(
    snapshot_count: usize,
    storage_ok: bool,
    observability: ObservabilitySnapshot,
) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "# HELP wagerboard_snapshots_stored Snapshot documents currently in the archive."
    );
    let _ = writeln!(body, "# TYPE wagerboard_snapshots_stored gauge");
    let _ = writeln!(body, "wagerboard_snapshots_stored {snapshot_count}");

    let _ = writeln!(
        body,
        "# HELP wagerboard_storage_available Whether the document store is readable (1 or 0)."
    );
    let _ = writeln!(body, "# TYPE wagerboard_storage_available gauge");
    let _ = writeln!(body, "wagerboard_storage_available {}", u8::from(storage_ok));

    let counters = [
        (
            "wagerboard_leaderboard_requests_total",
            "Total leaderboard read requests.",
            observability.leaderboard_requests_total,
        ),
        (
            "wagerboard_upstream_errors_total",
            "Total upstream provider failures.",
            observability.upstream_errors_total,
        ),
        (
            "wagerboard_snapshot_captures_total",
            "Total snapshots captured.",
            observability.snapshot_captures_total,
        ),
        (
            "wagerboard_capture_conflicts_total",
            "Total capture attempts rejected by the single-flight guard.",
            observability.capture_conflicts_total,
        ),
        (
            "wagerboard_settings_writes_total",
            "Total accepted settings writes.",
            observability.settings_writes_total,
        ),
        (
            "wagerboard_settings_rejections_total",
            "Total settings writes rejected by validation.",
            observability.settings_rejections_total,
        ),
    ];
    for (name, help, value) in counters {
        let _ = writeln!(body, "# HELP {name} {help}");
        let _ = writeln!(body, "# TYPE {name} counter");
        let _ = writeln!(body, "{name} {value}");
    }

    body
}

pub async fn auth_check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&state, &headers)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, ApiError> {
    let settings = settings_store::get_settings(state.store.as_ref()).await?;
    Ok(Json(settings))
}

pub async fn post_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<Settings>, ApiError> {
    require_admin(&state, &headers)?;
    match settings_store::update_settings(state.store.as_ref(), update).await {
        Ok(settings) => {
            state.observability.record_settings_write();
            Ok(Json(settings))
        }
        Err(e) => {
            if matches!(e, ApiError::Validation(_)) {
                state.observability.record_settings_rejection();
            }
            Err(e)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    #[serde(default)]
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RangeResponse {
    #[serde(rename = "startISO")]
    pub start_iso: NaiveDate,
    #[serde(rename = "endISO")]
    pub end_iso: NaiveDate,
    pub source: wagerboard_shared::RangeSource,
    pub period: Period,
}

impl RangeResponse {
    fn new(window: RangeWindow, period: Period) -> Self {
        Self {
            start_iso: window.start,
            end_iso: window.end,
            source: window.source,
            period,
        }
    }
}

/// A period supplied on the query string overrides the stored one; an
/// unknown value falls back to weekly, matching the resolver's trailing
/// default.
fn effective_period(query_period: Option<&str>, settings: &Settings) -> Period {
    match query_period {
        Some(raw) => Period::parse(raw).unwrap_or(Period::Weekly),
        None => settings.period,
    }
}

pub async fn get_range(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<RangeResponse>, ApiError> {
    let settings = settings_store::get_settings(state.store.as_ref()).await?;
    let period = effective_period(query.period.as_deref(), &settings);
    let window = resolve_range(period, &settings.custom_range, Utc::now().date_naive());
    Ok(Json(RangeResponse::new(window, period)))
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    /// Period name, kept as `range` for compatibility with the frontend.
    #[serde(default)]
    pub range: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RankedRow {
    pub username: String,
    pub wagered: f64,
    pub rank: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bets: Option<u64>,
    pub payout: f64,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub data: Vec<RankedRow>,
    pub range: RangeResponse,
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    state.observability.record_leaderboard_request();
    let settings = settings_store::get_settings(state.store.as_ref()).await?;
    let period = effective_period(query.range.as_deref(), &settings);
    let window = resolve_range(period, &settings.custom_range, Utc::now().date_naive());
    let limit = query
        .limit
        .map(|raw| raw.clamp(1, wagerboard_shared::MAX_PAGE_SIZE as i64) as usize)
        .unwrap_or(settings.page_size);

    let entries = rankings::fetch_ranked(&state.http_client, &state.upstream, &window, limit)
        .await
        .inspect_err(|_| state.observability.record_upstream_error())?;

    let data = entries
        .into_iter()
        .map(|entry| priced_row(entry, &settings))
        .collect();
    Ok(Json(LeaderboardResponse {
        data,
        range: RangeResponse::new(window, period),
    }))
}

fn priced_row(entry: LeaderboardEntry, settings: &Settings) -> RankedRow {
    let payout = payout_for(entry.rank, &settings.prize_config);
    RankedRow {
        username: entry.username,
        wagered: entry.wagered,
        rank: entry.rank,
        bets: entry.bets,
        payout,
    }
}

#[derive(Debug, Serialize)]
pub struct SnapshotList {
    pub data: Vec<SnapshotSummary>,
}

pub async fn list_past(State(state): State<AppState>) -> Result<Json<SnapshotList>, ApiError> {
    let data = archive::list(&state).await?;
    Ok(Json(SnapshotList { data }))
}

pub async fn get_past(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Snapshot>, ApiError> {
    let snapshot = archive::get(&state, &id).await?;
    Ok(Json(snapshot))
}

pub async fn post_snapshot(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&state, &headers)?;
    let snapshot = archive::capture(&state).await?;
    Ok(Json(serde_json::json!({ "ok": true, "id": snapshot.id })))
}

#[derive(Debug, Deserialize)]
pub struct ImageReport {
    pub image: String,
}

/// Callback for the external renderer collaborator: records the produced
/// image reference against the snapshot, once.
pub async fn post_snapshot_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(report): Json<ImageReport>,
) -> Result<Json<Snapshot>, ApiError> {
    require_admin(&state, &headers)?;
    let snapshot = archive::attach_image(&state, &id, &report.image).await?;
    Ok(Json(snapshot))
}
