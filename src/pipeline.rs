//! One end-to-end leaderboard run
//!
//! Season feed → distinct teams → rosters (cache first) → merge → rank.

use thiserror::Error;
use tracing::{error, info};

use crate::acquire::RosterAcquirer;
use crate::data::{StatsClient, StatsError};
use crate::leaderboard::{cohort_title, merge, rank, Leaderboard, RosterIndex, DEFAULT_LIMIT};
use crate::progress::Progress;

/// Sub-season id the roster site uses for the 2025-26 season
pub const DEFAULT_SEASON: &str = "948428";

/// Grade ranked by default (freshmen)
pub const DEFAULT_GRADE: &str = "9";

/// What a run ranks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Sub-season id used in roster URLs and cache keys
    pub season: String,
    /// Only players whose roster grade equals this are ranked
    pub grade: String,
    /// Maximum number of ranked players
    pub limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            season: DEFAULT_SEASON.to_string(),
            grade: DEFAULT_GRADE.to_string(),
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Errors that stop a run from producing any result
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The season feed could not be loaded
    #[error("Failed to load data: {0}")]
    Stats(#[from] StatsError),
}

/// Receives the outcome of a run
pub trait Presenter {
    /// The run produced no result.
    fn show_error(&mut self, message: &str);

    /// The run finished with a ranked list.
    fn show_leaderboard(&mut self, board: &Leaderboard);
}

/// Sequences the feed, roster acquisition, and ranking
#[derive(Debug, Clone)]
pub struct Pipeline {
    stats_client: StatsClient,
    acquirer: RosterAcquirer,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(stats_client: StatsClient, acquirer: RosterAcquirer, config: PipelineConfig) -> Self {
        Self {
            stats_client,
            acquirer,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the pipeline once
    ///
    /// Takes `&mut self` so the same pipeline, and the cache behind it, is
    /// never driven by two runs at once. Only a season feed failure is an
    /// error; roster failures end up in [`Leaderboard::failed_teams`].
    pub async fn run(&mut self, progress: &mut dyn Progress) -> Result<Leaderboard, PipelineError> {
        progress.status("Loading player stats...");
        let stats = self.stats_client.fetch_season_stats().await?;

        let team_ids = stats.team_ids();
        info!(teams = team_ids.len(), "found teams in season feed");
        progress.status(&format!(
            "Loading roster data for {} teams...",
            team_ids.len()
        ));

        let acquired = self
            .acquirer
            .acquire_all(&team_ids, &self.config.season, progress)
            .await;

        let index = RosterIndex::build(&acquired.rosters);
        info!(players = index.len(), "indexed roster players");

        let eligible = merge(&stats.players, &index, &self.config.grade);
        let eligible_count = eligible.len();
        let players = rank(eligible, self.config.limit);
        info!(
            grade = %self.config.grade,
            eligible = eligible_count,
            shown = players.len(),
            "ranked players"
        );

        Ok(Leaderboard {
            title: cohort_title(&self.config.grade, self.config.limit),
            grade: self.config.grade.clone(),
            players,
            eligible: eligible_count,
            last_updated: stats.last_updated,
            failed_teams: acquired.failures,
        })
    }

    /// Runs once and hands the outcome to the presenter
    ///
    /// The progress indicator is finished before the presenter is called.
    /// Returns whether a leaderboard was produced.
    pub async fn run_and_present(
        &mut self,
        progress: &mut dyn Progress,
        presenter: &mut dyn Presenter,
    ) -> bool {
        let outcome = self.run(progress).await;
        progress.finish();

        match outcome {
            Ok(board) => {
                presenter.show_leaderboard(&board);
                true
            }
            Err(e) => {
                error!(error = %e, "leaderboard run failed");
                presenter.show_error(&e.to_string());
                false
            }
        }
    }
}
