//! Roster page client
//!
//! Downloads one team's roster page with a hard deadline and hands the markup
//! to the roster page parser. Caching is left to the caller.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::roster_page::{parse_roster_page, ParseError};
use super::TeamRoster;

/// Base URL of the roster site
pub const DEFAULT_ROSTER_BASE_URL: &str = "https://www.legacy.hockey";

/// Deadline for receiving a complete roster page
pub const ROSTER_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when fetching a roster page
#[derive(Debug, Error)]
pub enum RosterError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {0}")]
    Status(StatusCode),

    /// The page did not arrive before the deadline; the request was cancelled
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The page could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Client for fetching team roster pages
#[derive(Debug, Clone)]
pub struct RosterClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL for roster pages (allows override for testing)
    base_url: String,
    /// Per-request deadline
    timeout: Duration,
}

impl Default for RosterClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterClient {
    /// Creates a new RosterClient pointed at the public roster site
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_ROSTER_BASE_URL.to_string())
    }

    /// Creates a new RosterClient with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: ROSTER_TIMEOUT,
        }
    }

    /// Replaces the per-request deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of a team's roster page for one sub-season
    pub fn roster_url(&self, team_id: &str, season: &str) -> String {
        format!(
            "{}/roster/show/{}?subseason={}",
            self.base_url, team_id, season
        )
    }

    /// Fetches and parses a team's roster page
    ///
    /// # Returns
    /// * `Ok(TeamRoster)` - Parsed roster, possibly empty if the page had no table
    /// * `Err(RosterError::Timeout)` - No complete response within the deadline
    /// * `Err(RosterError::Status)` - The server answered with an error status
    /// * `Err(RosterError::Network)` - The request failed in transit
    pub async fn fetch_roster(&self, team_id: &str, season: &str) -> Result<TeamRoster, RosterError> {
        let url = self.roster_url(team_id, season);

        // Dropping the future on timeout aborts the in-flight request
        let html = match tokio::time::timeout(self.timeout, self.fetch_page(&url)).await {
            Ok(result) => result?,
            Err(_) => return Err(RosterError::Timeout(self.timeout)),
        };

        let roster = parse_roster_page(&html)?;
        debug!(
            team_id,
            team_name = %roster.team_name,
            players = roster.players.len(),
            "parsed roster page"
        );
        Ok(roster)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, RosterError> {
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RosterError::Status(status));
        }

        Ok(response.text().await?)
    }
}
