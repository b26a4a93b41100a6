use serde::Deserialize;
use wagerboard_shared::{LeaderboardEntry, MAX_PAGE_SIZE, RangeWindow};

use crate::error::ApiError;

/// Upstream affiliate-ranking provider endpoint plus its credential.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AffiliatesPayload {
    #[serde(default)]
    affiliates: Vec<RawAffiliate>,
}

/// Raw provider record. The metric arrives as either a number or a
/// numeric string depending on provider version, so both are coerced.
#[derive(Debug, Default, Deserialize)]
struct RawAffiliate {
    #[serde(default)]
    username: String,
    #[serde(default)]
    wagered_amount: serde_json::Value,
    #[serde(default)]
    bets: serde_json::Value,
}

/// Fetches the provider records for `range` and returns them filtered,
/// sorted, truncated and densely ranked. Stateless; any failure surfaces
/// as a single `Upstream` error with no internal retries.
pub async fn fetch_ranked(
    client: &reqwest::Client,
    upstream: &UpstreamConfig,
    range: &RangeWindow,
    limit: usize,
) -> Result<Vec<LeaderboardEntry>, ApiError> {
    let Some(api_key) = upstream.api_key.as_deref() else {
        return Err(ApiError::Upstream("RANKINGS_API_KEY is not configured".into()));
    };

    let mut url = reqwest::Url::parse(&upstream.base_url)
        .map_err(|e| ApiError::Upstream(format!("invalid provider url: {e}")))?;
    url.query_pairs_mut()
        .append_pair("start_at", &range.start.format("%Y-%m-%d").to_string())
        .append_pair("end_at", &range.end.format("%Y-%m-%d").to_string())
        .append_pair("key", api_key);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ApiError::Upstream(format!("provider unreachable: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Upstream(format!(
            "provider returned status {status}"
        )));
    }

    let payload: AffiliatesPayload = response
        .json()
        .await
        .map_err(|e| ApiError::Upstream(format!("unparseable provider payload: {e}")))?;

    Ok(rank_affiliates(payload.affiliates, limit))
}

/// Pure ranking step: coerce metrics, drop non-positive rows, stable-sort
/// descending (ties keep provider order), truncate to the clamped limit
/// and assign dense 1-based ranks.
fn rank_affiliates(affiliates: Vec<RawAffiliate>, limit: usize) -> Vec<LeaderboardEntry> {
    let limit = limit.clamp(1, MAX_PAGE_SIZE);

    let mut rows: Vec<(String, f64, Option<u64>)> = affiliates
        .into_iter()
        .map(|raw| {
            (
                raw.username,
                coerce_metric(&raw.wagered_amount),
                coerce_count(&raw.bets),
            )
        })
        .filter(|(_, wagered, _)| *wagered > 0.0)
        .collect();

    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    rows.truncate(limit);

    rows.into_iter()
        .enumerate()
        .map(|(index, (username, wagered, bets))| LeaderboardEntry {
            username,
            wagered,
            rank: index as u32 + 1,
            bets,
        })
        .collect()
}

fn coerce_metric(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn coerce_count(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(username: &str, wagered: serde_json::Value) -> RawAffiliate {
        RawAffiliate {
            username: username.to_string(),
            wagered_amount: wagered,
            bets: serde_json::Value::Null,
        }
    }

    #[test]
    fn ranks_are_dense_sorted_and_positive_only() {
        let affiliates = vec![
            raw("low", serde_json::json!(10.5)),
            raw("zero", serde_json::json!(0)),
            raw("high", serde_json::json!("950.25")),
            raw("negative", serde_json::json!(-3)),
            raw("mid", serde_json::json!(100)),
        ];
        let ranked = rank_affiliates(affiliates, 50);
        let names: Vec<&str> = ranked.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
        let ranks: Vec<u32> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        for pair in ranked.windows(2) {
            assert!(pair[0].wagered >= pair[1].wagered);
        }
    }

    #[test]
    fn ties_keep_provider_order() {
        let affiliates = vec![
            raw("first", serde_json::json!(100)),
            raw("second", serde_json::json!(100)),
            raw("third", serde_json::json!(100)),
        ];
        let ranked = rank_affiliates(affiliates, 10);
        let names: Vec<&str> = ranked.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn limit_truncates_after_filtering_and_is_clamped() {
        let affiliates: Vec<RawAffiliate> = (0..30)
            .map(|i| raw(&format!("user{i}"), serde_json::json!(1000 - i)))
            .collect();
        let ranked = rank_affiliates(affiliates, 5);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked.last().unwrap().rank, 5);

        let affiliates: Vec<RawAffiliate> = (0..3)
            .map(|i| raw(&format!("user{i}"), serde_json::json!(10 + i)))
            .collect();
        // A zero limit clamps up to one row rather than none.
        assert_eq!(rank_affiliates(affiliates, 0).len(), 1);
    }

    #[test]
    fn unparseable_metrics_default_to_zero_and_drop_out() {
        let affiliates = vec![
            raw("garbled", serde_json::json!("not-a-number")),
            raw("missing", serde_json::Value::Null),
            raw("ok", serde_json::json!("12.5")),
        ];
        let ranked = rank_affiliates(affiliates, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].username, "ok");
        assert_eq!(ranked[0].wagered, 12.5);
    }

    #[test]
    fn bets_coerce_from_numbers_and_strings() {
        let mut record = raw("a", serde_json::json!(5));
        record.bets = serde_json::json!(17);
        assert_eq!(rank_affiliates(vec![record], 10)[0].bets, Some(17));

        let mut record = raw("b", serde_json::json!(5));
        record.bets = serde_json::json!("23");
        assert_eq!(rank_affiliates(vec![record], 10)[0].bets, Some(23));

        let record = raw("c", serde_json::json!(5));
        assert_eq!(rank_affiliates(vec![record], 10)[0].bets, None);
    }

    #[test]
    fn empty_provider_list_yields_zero_entries() {
        assert!(rank_affiliates(Vec::new(), 10).is_empty());
    }
}
