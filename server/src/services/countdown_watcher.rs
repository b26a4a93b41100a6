use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::archive;
use crate::config::COUNTDOWN_POLL_SECS;
use crate::settings_store;
use crate::state::AppState;

/// Watches the configured countdown deadline and captures one snapshot
/// when it passes. Each deadline fires at most once; a new deadline set
/// by the admin re-arms the watcher.
pub async fn run(state: AppState) {
    info!(
        "Countdown watcher started (interval: {}s)",
        COUNTDOWN_POLL_SECS
    );
    let mut interval = tokio::time::interval(Duration::from_secs(COUNTDOWN_POLL_SECS));
    let mut last_fired: Option<String> = None;

    loop {
        interval.tick().await;

        let settings = match settings_store::get_settings(state.store.as_ref()).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "countdown watcher failed to read settings");
                continue;
            }
        };

        if let Some(deadline) = due_deadline(&settings.countdown_end_iso, Utc::now())
            && last_fired.as_deref() != Some(deadline)
        {
            last_fired = Some(deadline.to_string());
            match archive::capture(&state).await {
                Ok(snapshot) => {
                    info!(id = %snapshot.id, deadline, "countdown reached zero, snapshot captured");
                }
                Err(e) => {
                    warn!(error = %e, deadline, "countdown snapshot capture failed");
                }
            }
        }
    }
}

/// Returns the deadline string when it parses and has passed.
fn due_deadline(countdown_end_iso: &str, now: DateTime<Utc>) -> Option<&str> {
    let raw = countdown_end_iso.trim();
    if raw.is_empty() {
        return None;
    }
    let deadline = DateTime::parse_from_rfc3339(raw).ok()?;
    (now >= deadline.with_timezone(&Utc)).then_some(raw)
}
