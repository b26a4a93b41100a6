use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use wagerboard_shared::{
    Countdown, CountdownUnit, CustomRange, LeaderboardEntry, Period, PrizeConfig, Settings,
    Snapshot, SnapshotRange, SocialLink,
};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Persisted settings document. Field names are the storage schema
/// (snake_case); the API model serializes camelCase. All conversions
/// between the two shapes live here and nowhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(default = "default_period")]
    pub period: Period,
    #[serde(default)]
    pub custom_range: CustomRange,
    #[serde(default)]
    pub countdown: StoredCountdown,
    #[serde(default)]
    pub countdown_end_iso: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_banner_title")]
    pub banner_title: String,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
    #[serde(default)]
    pub prize_config: StoredPrizeConfig,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_period() -> Period {
    Period::Weekly
}

fn default_page_size() -> usize {
    wagerboard_shared::DEFAULT_PAGE_SIZE
}

fn default_banner_title() -> String {
    wagerboard_shared::DEFAULT_BANNER_TITLE.to_string()
}

/// Countdown as persisted. Early deployments stored a bare number of
/// elapsed seconds; reads accept both shapes and only the structured one
/// is ever written back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredCountdown {
    Structured { value: f64, unit: CountdownUnit },
    LegacySeconds(f64),
}

impl Default for StoredCountdown {
    fn default() -> Self {
        let Countdown { value, unit } = Countdown::default();
        Self::Structured { value, unit }
    }
}

impl StoredCountdown {
    /// Migration to the current shape: a legacy seconds value becomes a
    /// whole number of days, rounded.
    pub fn into_domain(self) -> Countdown {
        match self {
            Self::Structured { value, unit } => Countdown { value, unit },
            Self::LegacySeconds(seconds) => Countdown {
                value: (seconds.max(0.0) / SECONDS_PER_DAY).round(),
                unit: CountdownUnit::Days,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredPrizeConfig {
    #[serde(default)]
    pub paid_placements: usize,
    #[serde(default)]
    pub amounts: Vec<f64>,
}

impl StoredSettings {
    pub fn from_domain(settings: &Settings) -> Self {
        Self {
            period: settings.period,
            custom_range: settings.custom_range.clone(),
            countdown: StoredCountdown::Structured {
                value: settings.countdown.value,
                unit: settings.countdown.unit,
            },
            countdown_end_iso: settings.countdown_end_iso.clone(),
            page_size: settings.page_size,
            banner_title: settings.banner_title.clone(),
            socials: settings.socials.clone(),
            prize_config: StoredPrizeConfig {
                paid_placements: settings.prize_config.paid_placements,
                amounts: settings.prize_config.amounts.clone(),
            },
            updated_at: settings.updated_at,
        }
    }

    pub fn into_domain(self) -> Settings {
        Settings {
            period: self.period,
            custom_range: self.custom_range,
            countdown: self.countdown.into_domain(),
            countdown_end_iso: self.countdown_end_iso,
            page_size: self.page_size,
            banner_title: self.banner_title,
            socials: self.socials,
            prize_config: PrizeConfig {
                paid_placements: self.prize_config.paid_placements,
                amounts: self.prize_config.amounts,
            },
            updated_at: self.updated_at,
        }
    }
}

/// Persisted snapshot document, one per capture, keyed by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSnapshot {
    pub id: String,
    pub taken_at: DateTime<Utc>,
    pub period: Period,
    pub range: StoredRange,
    pub banner_title: String,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
    #[serde(default)]
    pub prize_config: StoredPrizeConfig,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub data: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StoredSnapshot {
    pub fn from_domain(snapshot: &Snapshot) -> Self {
        Self {
            id: snapshot.id.clone(),
            taken_at: snapshot.taken_at,
            period: snapshot.period,
            range: StoredRange {
                start: snapshot.range.start,
                end: snapshot.range.end,
            },
            banner_title: snapshot.banner_title.clone(),
            socials: snapshot.socials.clone(),
            prize_config: StoredPrizeConfig {
                paid_placements: snapshot.prize_config.paid_placements,
                amounts: snapshot.prize_config.amounts.clone(),
            },
            page_size: snapshot.page_size,
            data: snapshot.data.clone(),
            image: snapshot.image.clone(),
        }
    }

    pub fn into_domain(self) -> Snapshot {
        Snapshot {
            id: self.id,
            taken_at: self.taken_at,
            period: self.period,
            range: SnapshotRange {
                start: self.range.start,
                end: self.range.end,
            },
            banner_title: self.banner_title,
            socials: self.socials,
            prize_config: PrizeConfig {
                paid_placements: self.prize_config.paid_placements,
                amounts: self.prize_config.amounts,
            },
            page_size: self.page_size,
            data: self.data,
            image: self.image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_settings() -> Settings {
        Settings {
            period: Period::Monthly,
            custom_range: CustomRange {
                enabled: true,
                start: "2026-01-01".into(),
                end: "2026-01-31".into(),
            },
            countdown: Countdown {
                value: 12.0,
                unit: CountdownUnit::Hours,
            },
            countdown_end_iso: "2026-02-01T00:00:00Z".into(),
            page_size: 25,
            banner_title: "$1000 Race".into(),
            socials: vec![SocialLink {
                name: "discord".into(),
                url: "https://discord.gg/example".into(),
            }],
            prize_config: PrizeConfig {
                paid_placements: 2,
                amounts: vec![700.0, 300.0],
            },
            updated_at: Some(Utc::now()),
        }
    }

    #[test]
    fn settings_round_trip_is_lossless() {
        let settings = sample_settings();
        let stored = StoredSettings::from_domain(&settings);
        let json = serde_json::to_string(&stored).expect("serialize stored settings");
        let reread: StoredSettings = serde_json::from_str(&json).expect("parse stored settings");
        assert_eq!(reread.into_domain(), settings);
    }

    #[test]
    fn stored_settings_use_snake_case_keys() {
        let stored = StoredSettings::from_domain(&sample_settings());
        let value = serde_json::to_value(&stored).expect("serialize stored settings");
        assert!(value.get("page_size").is_some());
        assert!(value.get("banner_title").is_some());
        assert!(value.get("countdown_end_iso").is_some());
        assert!(value.get("custom_range").is_some());
        assert_eq!(value["prize_config"]["paid_placements"], 2);
        assert!(value.get("pageSize").is_none());
    }

    #[test]
    fn legacy_numeric_countdown_upgrades_to_days_on_read() {
        // Three days of elapsed seconds, stored as a bare number.
        let json = r#"{"period":"weekly","countdown":259200}"#;
        let stored: StoredSettings = serde_json::from_str(json).expect("parse legacy settings");
        let settings = stored.into_domain();
        assert_eq!(settings.countdown.value, 3.0);
        assert_eq!(settings.countdown.unit, CountdownUnit::Days);
    }

    #[test]
    fn legacy_countdown_rounds_partial_days() {
        let json = r#"{"countdown":130000}"#;
        let stored: StoredSettings = serde_json::from_str(json).expect("parse legacy settings");
        // 130000 / 86400 = 1.504..., rounds to 2.
        assert_eq!(stored.into_domain().countdown.value, 2.0);
    }

    #[test]
    fn missing_fields_backfill_from_defaults() {
        let stored: StoredSettings = serde_json::from_str("{}").expect("parse empty document");
        let settings = stored.into_domain();
        assert_eq!(settings.period, Period::Weekly);
        assert_eq!(settings.page_size, wagerboard_shared::DEFAULT_PAGE_SIZE);
        assert_eq!(settings.banner_title, wagerboard_shared::DEFAULT_BANNER_TITLE);
        assert!(settings.socials.is_empty());
        assert_eq!(settings.prize_config.paid_placements, 0);
        assert!(!settings.custom_range.enabled);
    }

    #[test]
    fn snapshot_round_trip_is_lossless() {
        let snapshot = Snapshot {
            id: "20260825T101530123Z".into(),
            taken_at: Utc::now(),
            period: Period::Weekly,
            range: SnapshotRange {
                start: NaiveDate::from_ymd_opt(2026, 8, 19).unwrap(),
                end: NaiveDate::from_ymd_opt(2026, 8, 25).unwrap(),
            },
            banner_title: "weekly race".into(),
            socials: Vec::new(),
            prize_config: PrizeConfig {
                paid_placements: 1,
                amounts: vec![100.0],
            },
            page_size: 10,
            data: vec![LeaderboardEntry {
                username: "alice".into(),
                wagered: 420.5,
                rank: 1,
                bets: Some(37),
            }],
            image: Some("https://cdn.example/x.png".into()),
        };
        let stored = StoredSnapshot::from_domain(&snapshot);
        let json = serde_json::to_string(&stored).expect("serialize stored snapshot");
        let reread: StoredSnapshot = serde_json::from_str(&json).expect("parse stored snapshot");
        assert_eq!(reread.into_domain(), snapshot);
    }
}
