use chrono::{Days, NaiveDate};

use crate::leaderboard::{RangeSource, RangeWindow};
use crate::settings::{CustomRange, Period};

/// Resolves the reporting window for a leaderboard read.
///
/// An enabled custom range with two well-formed dates is returned verbatim:
/// no reordering, no start/end sanity check. Ordering is enforced when the
/// range is written, not here. Otherwise the window is the trailing
/// `period.trailing_days()` days ending on `today`, end-inclusive. `today`
/// is an argument so one invocation works from a single date reference.
pub fn resolve_range(period: Period, custom: &CustomRange, today: NaiveDate) -> RangeWindow {
    if custom.enabled
        && let (Some(start), Some(end)) = (parse_date(&custom.start), parse_date(&custom.end))
    {
        return RangeWindow {
            start,
            end,
            source: RangeSource::Custom,
        };
    }
    trailing_window(period, today)
}

fn trailing_window(period: Period, today: NaiveDate) -> RangeWindow {
    let length = period.trailing_days();
    let start = today
        .checked_sub_days(Days::new((length - 1) as u64))
        .unwrap_or(today);
    RangeWindow {
        start,
        end: today,
        source: RangeSource::Computed,
    }
}

/// Builds a window from an upstream range-discovery payload, accepting the
/// `start_at`/`end_at` and `start`/`end` key pairs. Falls back to the
/// computed trailing window when the payload lacks recognizable dates.
pub fn window_from_api_value(
    value: &serde_json::Value,
    period: Period,
    today: NaiveDate,
) -> RangeWindow {
    let start = date_field(value, &["start_at", "start"]);
    let end = date_field(value, &["end_at", "end"]);
    match (start, end) {
        (Some(start), Some(end)) => RangeWindow {
            start,
            end,
            source: RangeSource::Api,
        },
        _ => trailing_window(period, today),
    }
}

fn date_field(value: &serde_json::Value, keys: &[&str]) -> Option<NaiveDate> {
    keys.iter()
        .find_map(|key| value.get(key))
        .and_then(|v| v.as_str())
        .and_then(parse_date)
}

/// Strict `YYYY-MM-DD` parse: fixed width, real calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
