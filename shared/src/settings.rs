use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_PAGE_SIZE: usize = 100;
pub const MAX_BANNER_TITLE_LEN: usize = 80;
pub const MAX_SOCIAL_LINKS: usize = 5;
pub const MAX_SOCIAL_NAME_LEN: usize = 40;
pub const MAX_SOCIAL_URL_LEN: usize = 200;

pub const DEFAULT_PAGE_SIZE: usize = 15;
pub const DEFAULT_BANNER_TITLE: &str = "$500 Monthly Leaderboard";

/// Named trailing-window length used when no custom range is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Weekly,
    Biweekly,
    Monthly,
}

impl Period {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "weekly" => Some(Self::Weekly),
            "biweekly" => Some(Self::Biweekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// Window length in days, end-inclusive.
    pub fn trailing_days(self) -> i64 {
        match self {
            Self::Weekly => 7,
            Self::Biweekly => 14,
            Self::Monthly => 30,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Admin-specified explicit start/end date pair overriding the period window.
/// Dates are `YYYY-MM-DD` strings; validation happens at settings write time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRange {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl CustomRange {
    pub fn cleared() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl CountdownUnit {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "minutes" => Some(Self::Minutes),
            "hours" => Some(Self::Hours),
            "days" => Some(Self::Days),
            "weeks" => Some(Self::Weeks),
            _ => None,
        }
    }
}

/// Structured countdown duration shown in the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    pub value: f64,
    pub unit: CountdownUnit,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            value: 7.0,
            unit: CountdownUnit::Days,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Mapping from rank to payout amount for the top `paid_placements` ranks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrizeConfig {
    #[serde(default)]
    pub paid_placements: usize,
    #[serde(default)]
    pub amounts: Vec<f64>,
}

/// The singleton leaderboard configuration. Serialized form matches the
/// public API (camelCase); the persisted document uses its own schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub period: Period,
    pub custom_range: CustomRange,
    pub countdown: Countdown,
    /// RFC 3339 deadline driving the public countdown and auto-capture.
    /// Empty string when no deadline is set.
    #[serde(rename = "countdownEndISO")]
    pub countdown_end_iso: String,
    pub page_size: usize,
    pub banner_title: String,
    pub socials: Vec<SocialLink>,
    pub prize_config: PrizeConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            period: Period::Weekly,
            custom_range: CustomRange::default(),
            countdown: Countdown::default(),
            countdown_end_iso: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            banner_title: DEFAULT_BANNER_TITLE.to_string(),
            socials: Vec::new(),
            prize_config: PrizeConfig::default(),
            updated_at: None,
        }
    }
}
