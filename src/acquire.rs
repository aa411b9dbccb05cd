//! Sequential roster acquisition
//!
//! Walks the season's teams one at a time: cached rosters are used as-is,
//! everything else is fetched, written back to the cache, and followed by a
//! short pause so the roster site never sees more than one request in flight
//! or a burst of back-to-back requests.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cache::CacheManager;
use crate::data::{RosterClient, TeamRoster};
use crate::progress::Progress;

/// Pause after each network fetch on ordinary connections
pub const STANDARD_DELAY: Duration = Duration::from_millis(50);

/// Pause after each network fetch on slow or mobile connections
pub const CONSTRAINED_DELAY: Duration = Duration::from_millis(150);

/// A status line is emitted every this many teams
const STATUS_EVERY: usize = 5;

/// How hard the roster site may be hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThrottleProfile {
    #[default]
    Standard,
    Constrained,
}

impl ThrottleProfile {
    /// Pause applied after each network fetch
    pub fn delay(self) -> Duration {
        match self {
            ThrottleProfile::Standard => STANDARD_DELAY,
            ThrottleProfile::Constrained => CONSTRAINED_DELAY,
        }
    }
}

/// Cache key for a team's roster in one sub-season
pub fn roster_cache_key(team_id: &str, season: &str) -> String {
    format!("team_{}_{}", team_id, season)
}

/// Rosters gathered by one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcquiredRosters {
    /// (team id, roster) pairs in acquisition order
    pub rosters: Vec<(String, TeamRoster)>,
    /// Teams whose roster could not be fetched
    pub failures: Vec<String>,
    /// How many rosters came from the cache
    pub cache_hits: usize,
}

impl AcquiredRosters {
    /// Roster acquired for a team, if any
    pub fn roster(&self, team_id: &str) -> Option<&TeamRoster> {
        self.rosters
            .iter()
            .find(|(id, _)| id == team_id)
            .map(|(_, roster)| roster)
    }

    /// Total roster entries across all teams
    pub fn player_count(&self) -> usize {
        self.rosters.iter().map(|(_, r)| r.players.len()).sum()
    }
}

/// Cache-first, throttled roster loader
#[derive(Debug, Clone)]
pub struct RosterAcquirer {
    client: RosterClient,
    cache: Option<CacheManager>,
    delay: Duration,
}

impl RosterAcquirer {
    /// Creates an acquirer with the standard throttle
    pub fn new(client: RosterClient, cache: Option<CacheManager>) -> Self {
        Self {
            client,
            cache,
            delay: ThrottleProfile::default().delay(),
        }
    }

    /// Uses the pause of the given throttle profile
    pub fn with_throttle(self, profile: ThrottleProfile) -> Self {
        self.with_delay(profile.delay())
    }

    /// Uses an explicit pause after each network fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Loads every team's roster, one team at a time
    ///
    /// Never fails as a whole: a team whose fetch errors is logged, listed in
    /// `failures`, and skipped.
    pub async fn acquire_all(
        &self,
        team_ids: &[String],
        season: &str,
        progress: &mut dyn Progress,
    ) -> AcquiredRosters {
        let total = team_ids.len();
        let mut acquired = AcquiredRosters::default();

        for (index, team_id) in team_ids.iter().enumerate() {
            let key = roster_cache_key(team_id, season);

            if let Some(roster) = self.cached_roster(&key) {
                debug!(team_id = %team_id, "roster served from cache");
                acquired.cache_hits += 1;
                acquired.rosters.push((team_id.clone(), roster));
            } else {
                match self.client.fetch_roster(team_id, season).await {
                    Ok(roster) => {
                        self.store_roster(&key, &roster);
                        acquired.rosters.push((team_id.clone(), roster));
                    }
                    Err(e) => {
                        warn!(team_id = %team_id, error = %e, "failed to fetch team roster");
                        acquired.failures.push(team_id.clone());
                    }
                }
                tokio::time::sleep(self.delay).await;
            }

            let done = index + 1;
            progress.teams_done(done, total);
            if done % STATUS_EVERY == 0 || done == total {
                progress.status(&format!("Loading rosters... {}/{}", done, total));
            }
        }

        info!(
            teams = total,
            cache_hits = acquired.cache_hits,
            failures = acquired.failures.len(),
            players = acquired.player_count(),
            "loaded rosters"
        );
        acquired
    }

    fn cached_roster(&self, key: &str) -> Option<TeamRoster> {
        let cache = self.cache.as_ref()?;
        cache.read::<TeamRoster>(key).map(|cached| cached.data)
    }

    fn store_roster(&self, key: &str, roster: &TeamRoster) {
        if let Some(ref cache) = self.cache {
            if let Err(e) = cache.write(key, roster) {
                warn!(key, error = %e, "could not cache roster");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RosterEntry;
    use crate::progress::RecordingProgress;
    use chrono::{Duration as ChronoDuration, Utc};
    use std::time::Instant;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EAGLES_PAGE: &str = include_str!("../tests/fixtures/eagles_roster.html");
    const HAWKS_PAGE: &str = include_str!("../tests/fixtures/hawks_roster.html");
    const SEASON: &str = "948428";

    fn create_test_cache() -> (CacheManager, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        (cache, temp_dir)
    }

    fn acquirer(server: &MockServer, cache: Option<CacheManager>) -> RosterAcquirer {
        RosterAcquirer::new(RosterClient::with_base_url(server.uri()), cache)
            .with_delay(Duration::ZERO)
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn cached_roster() -> TeamRoster {
        let mut roster = TeamRoster {
            team_name: "Cached Owls".to_string(),
            ..Default::default()
        };
        roster.players.insert(
            "3001".to_string(),
            RosterEntry {
                number: "1".to_string(),
                position: "G".to_string(),
                grade: "9".to_string(),
            },
        );
        roster
    }

    async fn mount_page(server: &MockServer, team_id: &str, body: &str, expected: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/roster/show/{}", team_id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(expected)
            .mount(server)
            .await;
    }

    #[test]
    fn test_roster_cache_key_scheme() {
        assert_eq!(roster_cache_key("1234", "948428"), "team_1234_948428");
    }

    #[test]
    fn test_throttle_profiles() {
        assert_eq!(ThrottleProfile::Standard.delay(), Duration::from_millis(50));
        assert_eq!(ThrottleProfile::Constrained.delay(), Duration::from_millis(150));
        assert!(ThrottleProfile::Constrained.delay() > ThrottleProfile::default().delay());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let server = MockServer::start().await;
        mount_page(&server, "77", EAGLES_PAGE, 0).await;
        let (cache, _dir) = create_test_cache();
        cache
            .write(&roster_cache_key("77", SEASON), &cached_roster())
            .unwrap();

        let acquired = acquirer(&server, Some(cache))
            .acquire_all(&ids(&["77"]), SEASON, &mut RecordingProgress::default())
            .await;

        assert_eq!(acquired.cache_hits, 1);
        assert_eq!(acquired.roster("77"), Some(&cached_roster()));
    }

    #[tokio::test]
    async fn test_delay_follows_fetches_but_not_cache_hits() {
        let delay = Duration::from_millis(200);
        let server = MockServer::start().await;
        mount_page(&server, "1234", EAGLES_PAGE, 1).await;
        mount_page(&server, "5678", HAWKS_PAGE, 1).await;
        let (cache, _dir) = create_test_cache();
        let acquirer = RosterAcquirer::new(RosterClient::with_base_url(server.uri()), Some(cache))
            .with_delay(delay);
        let teams = ids(&["1234", "5678"]);

        let started = Instant::now();
        let fetched = acquirer
            .acquire_all(&teams, SEASON, &mut RecordingProgress::default())
            .await;
        let fetch_time = started.elapsed();

        let started = Instant::now();
        let cached = acquirer
            .acquire_all(&teams, SEASON, &mut RecordingProgress::default())
            .await;
        let cached_time = started.elapsed();

        assert_eq!(fetched.cache_hits, 0);
        assert_eq!(cached.cache_hits, 2);
        assert!(fetch_time >= delay * 2, "two fetches took only {:?}", fetch_time);
        assert!(cached_time < delay / 2, "cached pass took {:?}", cached_time);
    }

    #[tokio::test]
    async fn test_cache_miss_fetches_and_writes_back() {
        let server = MockServer::start().await;
        mount_page(&server, "1234", EAGLES_PAGE, 1).await;
        let (cache, _dir) = create_test_cache();

        let acquired = acquirer(&server, Some(cache.clone()))
            .acquire_all(&ids(&["1234"]), SEASON, &mut RecordingProgress::default())
            .await;

        assert_eq!(acquired.cache_hits, 0);
        let stored = cache
            .read::<TeamRoster>(&roster_cache_key("1234", SEASON))
            .expect("roster should be cached");
        assert_eq!(Some(&stored.data), acquired.roster("1234"));
        assert_eq!(stored.data.team_name, "Northside Eagles");
    }

    #[tokio::test]
    async fn test_expired_cache_entry_is_refetched() {
        let server = MockServer::start().await;
        mount_page(&server, "1234", EAGLES_PAGE, 1).await;
        let (cache, _dir) = create_test_cache();
        cache
            .write_at(
                &roster_cache_key("1234", SEASON),
                &cached_roster(),
                Utc::now() - ChronoDuration::days(7),
            )
            .unwrap();

        let acquired = acquirer(&server, Some(cache))
            .acquire_all(&ids(&["1234"]), SEASON, &mut RecordingProgress::default())
            .await;

        assert_eq!(acquired.cache_hits, 0);
        assert_eq!(acquired.roster("1234").unwrap().players.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_team_is_recorded_and_others_continue() {
        let server = MockServer::start().await;
        mount_page(&server, "1234", EAGLES_PAGE, 1).await;
        Mock::given(method("GET"))
            .and(path("/roster/show/404"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        mount_page(&server, "5678", HAWKS_PAGE, 1).await;

        let acquired = acquirer(&server, None)
            .acquire_all(
                &ids(&["1234", "404", "5678"]),
                SEASON,
                &mut RecordingProgress::default(),
            )
            .await;

        assert_eq!(acquired.failures, vec!["404".to_string()]);
        let order: Vec<&str> = acquired.rosters.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, vec!["1234", "5678"]);
    }

    #[tokio::test]
    async fn test_unwritable_cache_does_not_fail_the_team() {
        let server = MockServer::start().await;
        mount_page(&server, "1234", EAGLES_PAGE, 1).await;
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let acquired = acquirer(&server, Some(CacheManager::with_dir(blocker)))
            .acquire_all(&ids(&["1234"]), SEASON, &mut RecordingProgress::default())
            .await;

        assert!(acquired.failures.is_empty());
        assert_eq!(acquired.roster("1234").unwrap().players.len(), 3);
    }

    #[tokio::test]
    async fn test_progress_after_every_team_and_status_every_five() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(HAWKS_PAGE))
            .mount(&server)
            .await;
        let team_ids: Vec<String> = (1..=7).map(|i| i.to_string()).collect();
        let mut progress = RecordingProgress::default();

        acquirer(&server, None)
            .acquire_all(&team_ids, SEASON, &mut progress)
            .await;

        assert_eq!(progress.team_counts.len(), 7);
        assert_eq!(progress.team_counts.last(), Some(&(7, 7)));
        assert_eq!(
            progress.messages,
            vec!["Loading rosters... 5/7", "Loading rosters... 7/7"]
        );
    }

    #[tokio::test]
    async fn test_no_teams_reports_nothing() {
        let server = MockServer::start().await;
        let mut progress = RecordingProgress::default();

        let acquired = acquirer(&server, None)
            .acquire_all(&[], SEASON, &mut progress)
            .await;

        assert_eq!(acquired, AcquiredRosters::default());
        assert!(progress.team_counts.is_empty());
    }
}
