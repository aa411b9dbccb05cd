//! Season stats feed client
//!
//! Fetches the season's per-player totals from the published JSON feed.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use super::{SeasonStats, StatRecord};

/// Published season feed
pub const DEFAULT_STATS_URL: &str =
    "https://raw.githubusercontent.com/LegacyHockey/legacy-hockey-data/main/stats-2025-26.json";

/// Errors that can occur when fetching the season feed
#[derive(Debug, Error)]
pub enum StatsError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Season feed returned HTTP {0}")]
    Status(StatusCode),

    /// Failed to parse the feed body
    #[error("Failed to parse season feed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Feed document as published
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedResponse {
    #[serde(default)]
    players: Vec<StatRecord>,
    #[serde(default)]
    last_updated: Option<FeedTimestamp>,
}

/// `lastUpdated` is written either as an ISO-8601 string or epoch millis
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedTimestamp {
    Millis(i64),
    Text(String),
    Other(serde_json::Value),
}

impl FeedTimestamp {
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            FeedTimestamp::Millis(millis) => DateTime::from_timestamp_millis(*millis),
            FeedTimestamp::Text(text) => parse_iso_timestamp(text.trim()),
            FeedTimestamp::Other(_) => None,
        }
    }
}

/// Reads the ISO-8601 shapes the feed has been seen with
///
/// A full RFC 3339 timestamp keeps its offset. A date and time without an
/// offset is local time, and a bare date is midnight UTC.
fn parse_iso_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok());
    if let Some(naive) = naive {
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Client for fetching the season stats feed
#[derive(Debug, Clone)]
pub struct StatsClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Feed URL (allows override for testing)
    url: String,
}

impl Default for StatsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsClient {
    /// Creates a new StatsClient for the published feed
    pub fn new() -> Self {
        Self::with_url(DEFAULT_STATS_URL.to_string())
    }

    /// Creates a new StatsClient for a custom feed URL
    pub fn with_url(url: String) -> Self {
        Self {
            http_client: Client::new(),
            url,
        }
    }

    /// Fetches the season feed
    ///
    /// A `t=<epoch millis>` query parameter is added so intermediate HTTP
    /// caches never serve an old copy.
    pub async fn fetch_season_stats(&self) -> Result<SeasonStats, StatsError> {
        let cache_buster = Utc::now().timestamp_millis().to_string();
        let response = self
            .http_client
            .get(&self.url)
            .query(&[("t", cache_buster.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::Status(status));
        }

        let text = response.text().await?;
        let stats = parse_feed(&text)?;

        info!(players = stats.players.len(), "loaded season feed");
        match stats.last_updated {
            Some(last_updated) => info!(%last_updated, "season feed freshness"),
            None => info!("season feed has no lastUpdated timestamp"),
        }
        Ok(stats)
    }
}

/// Parses a feed document into [`SeasonStats`]
fn parse_feed(text: &str) -> Result<SeasonStats, serde_json::Error> {
    let feed: FeedResponse = serde_json::from_str(text)?;

    let last_updated = feed.last_updated.as_ref().and_then(|raw| {
        let parsed = raw.to_utc();
        if parsed.is_none() {
            warn!(value = ?raw, "ignoring unparseable lastUpdated");
        }
        parsed
    });

    Ok(SeasonStats {
        players: feed.players,
        last_updated,
    })
}
