use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::{Period, PrizeConfig, SocialLink};

/// One ranked participant row. Ranks are dense and 1-based; rows with a
/// non-positive wagered amount are dropped before ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub wagered: f64,
    pub rank: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bets: Option<u64>,
}

/// Where a resolved window came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeSource {
    Custom,
    Computed,
    Api,
}

/// A concrete reporting window, day granularity, end-inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub source: RangeSource,
}

/// Immutable capture of the ranked leaderboard plus the settings context
/// that produced it. Created only by the snapshot archiver; the `image`
/// reference is the single field that may later transition from None.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    pub taken_at: DateTime<Utc>,
    pub period: Period,
    pub range: SnapshotRange,
    pub banner_title: String,
    pub socials: Vec<SocialLink>,
    pub prize_config: PrizeConfig,
    pub page_size: usize,
    pub data: Vec<LeaderboardEntry>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl From<RangeWindow> for SnapshotRange {
    fn from(window: RangeWindow) -> Self {
        Self {
            start: window.start,
            end: window.end,
        }
    }
}

/// Listing row for the snapshot archive, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    pub id: String,
    pub taken_at: DateTime<Utc>,
    pub period: Period,
    pub range: SnapshotRange,
    pub banner_title: String,
    pub entry_count: usize,
    pub has_image: bool,
}

impl Snapshot {
    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            id: self.id.clone(),
            taken_at: self.taken_at,
            period: self.period,
            range: self.range,
            banner_title: self.banner_title.clone(),
            entry_count: self.data.len(),
            has_image: self.image.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_with_api_field_names() {
        let snapshot = Snapshot {
            id: "20260101T000000000Z".into(),
            taken_at: Utc::now(),
            period: Period::Weekly,
            range: SnapshotRange {
                start: NaiveDate::from_ymd_opt(2025, 12, 26).unwrap(),
                end: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            },
            banner_title: "title".into(),
            socials: Vec::new(),
            prize_config: PrizeConfig::default(),
            page_size: 15,
            data: Vec::new(),
            image: None,
        };
        let value = serde_json::to_value(&snapshot).expect("serialize snapshot");
        assert!(value.get("takenAt").is_some());
        assert!(value.get("bannerTitle").is_some());
        assert!(value.get("prizeConfig").is_some());
        assert_eq!(value["range"]["start"], "2025-12-26");
        assert_eq!(value["image"], serde_json::Value::Null);
    }

    #[test]
    fn summary_reports_image_presence_and_entry_count() {
        let mut snapshot = Snapshot {
            id: "s1".into(),
            taken_at: Utc::now(),
            period: Period::Monthly,
            range: SnapshotRange {
                start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2026, 1, 30).unwrap(),
            },
            banner_title: "t".into(),
            socials: Vec::new(),
            prize_config: PrizeConfig::default(),
            page_size: 10,
            data: vec![LeaderboardEntry {
                username: "a".into(),
                wagered: 1.0,
                rank: 1,
                bets: None,
            }],
            image: None,
        };
        assert!(!snapshot.summary().has_image);
        assert_eq!(snapshot.summary().entry_count, 1);
        snapshot.image = Some("https://cdn.example/s1.png".into());
        assert!(snapshot.summary().has_image);
    }
}
