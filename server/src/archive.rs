use chrono::{DateTime, Utc};
use tracing::info;
use wagerboard_shared::{Snapshot, SnapshotSummary, resolve_range};

use crate::config::SNAPSHOT_LIST_LIMIT;
use crate::error::ApiError;
use crate::services::rankings;
use crate::settings_store;
use crate::state::AppState;
use crate::storage::{StoredSnapshot, schema};

/// Captures one immutable snapshot of the current leaderboard state.
///
/// At most one capture runs at a time process-wide: the permit is
/// try-acquired, never awaited, so a concurrent caller fails fast with a
/// conflict instead of queueing. The permit guard releases on every exit
/// path, including upstream and storage failures.
pub async fn capture(state: &AppState) -> Result<Snapshot, ApiError> {
    let _permit = state.capture_permit.try_acquire().map_err(|_| {
        state.observability.record_capture_conflict();
        ApiError::CaptureInProgress
    })?;

    let settings = settings_store::get_settings(state.store.as_ref()).await?;
    let window = resolve_range(
        settings.period,
        &settings.custom_range,
        Utc::now().date_naive(),
    );

    let data = rankings::fetch_ranked(
        &state.http_client,
        &state.upstream,
        &window,
        settings.page_size,
    )
    .await
    .inspect_err(|_| state.observability.record_upstream_error())?;

    let taken_at = Utc::now();
    let snapshot = Snapshot {
        id: snapshot_id(taken_at),
        taken_at,
        period: settings.period,
        range: window.into(),
        banner_title: settings.banner_title,
        socials: settings.socials,
        prize_config: settings.prize_config,
        page_size: settings.page_size,
        data,
        image: None,
    };

    state
        .store
        .insert_snapshot(&StoredSnapshot::from_domain(&snapshot))
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?;
    state.observability.record_snapshot_capture();
    info!(
        id = %snapshot.id,
        entries = snapshot.data.len(),
        period = snapshot.period.as_str(),
        "snapshot captured"
    );
    Ok(snapshot)
}

/// Sortable, filesystem-safe snapshot key: UTC instant at nanosecond
/// precision with no colon or period characters.
fn snapshot_id(taken_at: DateTime<Utc>) -> String {
    taken_at.format("%Y%m%dT%H%M%S%fZ").to_string()
}

/// Archive listing, newest first by capture time.
pub async fn list(state: &AppState) -> Result<Vec<SnapshotSummary>, ApiError> {
    let mut summaries: Vec<SnapshotSummary> = state
        .store
        .load_snapshots()
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?
        .into_iter()
        .map(|document| document.into_domain().summary())
        .collect();
    summaries.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
    summaries.truncate(SNAPSHOT_LIST_LIMIT);
    Ok(summaries)
}

pub async fn get(state: &AppState, id: &str) -> Result<Snapshot, ApiError> {
    state
        .store
        .load_snapshot(id)
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?
        .map(schema::StoredSnapshot::into_domain)
        .ok_or_else(|| ApiError::SnapshotNotFound(id.to_string()))
}

/// Records the rendered image reference for a snapshot. The reference is
/// set at most once: repeating the same reference is accepted so the
/// renderer collaborator can safely retry, anything else is rejected.
pub async fn attach_image(state: &AppState, id: &str, reference: &str) -> Result<Snapshot, ApiError> {
    let mut snapshot = get(state, id).await?;
    match snapshot.image.as_deref() {
        None => {
            snapshot.image = Some(reference.to_string());
            state
                .store
                .replace_snapshot(&StoredSnapshot::from_domain(&snapshot))
                .await
                .map_err(|e| ApiError::Storage(e.to_string()))?;
            Ok(snapshot)
        }
        Some(existing) if existing == reference => Ok(snapshot),
        Some(_) => Err(ApiError::Validation(
            "snapshot image reference is already set".into(),
        )),
    }
}
