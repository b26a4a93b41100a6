use chrono::{DateTime, Utc};
use serde::Deserialize;
use wagerboard_shared::{
    Countdown, CountdownUnit, CustomRange, MAX_BANNER_TITLE_LEN, MAX_PAGE_SIZE, MAX_SOCIAL_LINKS,
    MAX_SOCIAL_NAME_LEN, MAX_SOCIAL_URL_LEN, Period, PrizeConfig, Settings, SocialLink, parse_date,
};

use crate::error::ApiError;
use crate::storage::{DocumentStore, StoredSettings};

/// Reads the settings singleton, back-filling any missing field from the
/// defaults. A store that has never been written yields the default
/// instance, not an error.
pub async fn get_settings(store: &dyn DocumentStore) -> Result<Settings, ApiError> {
    let stored = store
        .load_settings()
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?;
    Ok(stored.map(StoredSettings::into_domain).unwrap_or_default())
}

/// Validates an update against the current settings, stamps `updated_at`
/// and replaces the whole persisted document.
pub async fn update_settings(
    store: &dyn DocumentStore,
    update: SettingsUpdate,
) -> Result<Settings, ApiError> {
    let current = get_settings(store).await?;
    let next = apply_update(current, update, Utc::now())?;
    store
        .save_settings(&StoredSettings::from_domain(&next))
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?;
    Ok(next)
}

/// Incoming settings payload, field names as the public API spells them.
/// Absent fields keep their current value; present fields are validated,
/// clamped or truncated as documented per field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdate {
    pub period: Option<String>,
    pub custom_range: Option<CustomRangeUpdate>,
    pub countdown: Option<CountdownUpdate>,
    #[serde(rename = "countdownEndISO")]
    pub countdown_end_iso: Option<String>,
    pub page_size: Option<i64>,
    pub banner_title: Option<String>,
    pub socials: Option<Vec<SocialLink>>,
    pub prize_config: Option<PrizeConfigUpdate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomRangeUpdate {
    pub enabled: bool,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub struct CountdownUpdate {
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrizeConfigUpdate {
    pub paid_placements: i64,
    pub amounts: Vec<f64>,
}

pub fn apply_update(
    current: Settings,
    update: SettingsUpdate,
    now: DateTime<Utc>,
) -> Result<Settings, ApiError> {
    let mut next = current;

    if let Some(raw) = update.period {
        next.period = Period::parse(&raw).ok_or_else(|| {
            ApiError::Validation(format!(
                "period must be one of weekly, biweekly, monthly (got {raw:?})"
            ))
        })?;
    }

    if let Some(countdown) = update.countdown {
        if !countdown.value.is_finite() || countdown.value < 0.0 {
            return Err(ApiError::Validation(
                "countdown value must be a finite number >= 0".into(),
            ));
        }
        let unit = CountdownUnit::parse(&countdown.unit).ok_or_else(|| {
            ApiError::Validation(format!(
                "countdown unit must be one of minutes, hours, days, weeks (got {:?})",
                countdown.unit
            ))
        })?;
        next.countdown = Countdown {
            value: countdown.value,
            unit,
        };
    }

    if let Some(deadline) = update.countdown_end_iso {
        // Clamp rather than reject: an unparseable deadline clears it.
        next.countdown_end_iso = match DateTime::parse_from_rfc3339(deadline.trim()) {
            Ok(_) => deadline.trim().to_string(),
            Err(_) => String::new(),
        };
    }

    if let Some(page_size) = update.page_size {
        next.page_size = page_size.clamp(1, MAX_PAGE_SIZE as i64) as usize;
    }

    if let Some(title) = update.banner_title {
        next.banner_title = truncate_chars(&title, MAX_BANNER_TITLE_LEN);
    }

    if let Some(socials) = update.socials {
        next.socials = sanitize_socials(socials);
    }

    if let Some(prizes) = update.prize_config {
        next.prize_config = sanitize_prize_config(prizes);
    }

    if let Some(range) = update.custom_range {
        next.custom_range = sanitize_custom_range(range);
    }

    next.updated_at = Some(now);
    Ok(next)
}

fn truncate_chars(raw: &str, max: usize) -> String {
    if raw.chars().count() <= max {
        raw.to_string()
    } else {
        raw.chars().take(max).collect()
    }
}

fn sanitize_socials(socials: Vec<SocialLink>) -> Vec<SocialLink> {
    socials
        .into_iter()
        .filter(|link| !link.name.trim().is_empty() && !link.url.trim().is_empty())
        .map(|link| SocialLink {
            name: truncate_chars(link.name.trim(), MAX_SOCIAL_NAME_LEN),
            url: truncate_chars(link.url.trim(), MAX_SOCIAL_URL_LEN),
        })
        .take(MAX_SOCIAL_LINKS)
        .collect()
}

fn sanitize_prize_config(prizes: PrizeConfigUpdate) -> PrizeConfig {
    let paid_placements = prizes.paid_placements.clamp(0, MAX_PAGE_SIZE as i64) as usize;
    let mut amounts: Vec<f64> = prizes
        .amounts
        .into_iter()
        .map(|amount| if amount.is_finite() { amount.max(0.0) } else { 0.0 })
        .collect();
    amounts.resize(paid_placements, 0.0);
    PrizeConfig {
        paid_placements,
        amounts,
    }
}

/// A custom range is accepted whole or not at all: both dates must match
/// strict `YYYY-MM-DD` and start must not sort after end, otherwise the
/// range comes back disabled with both dates cleared.
fn sanitize_custom_range(range: CustomRangeUpdate) -> CustomRange {
    match (parse_date(&range.start), parse_date(&range.end)) {
        (Some(start), Some(end)) if start <= end => CustomRange {
            enabled: range.enabled,
            start: range.start,
            end: range.end,
        },
        _ => CustomRange::cleared(),
    }
}
