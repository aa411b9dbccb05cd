//! Command-line interface parsing for rosterboard
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into a validated [`RunConfig`] that can build the pipeline.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

use crate::acquire::{RosterAcquirer, ThrottleProfile};
use crate::cache::CacheManager;
use crate::data::roster::DEFAULT_ROSTER_BASE_URL;
use crate::data::stats::DEFAULT_STATS_URL;
use crate::data::{RosterClient, StatsClient};
use crate::leaderboard::DEFAULT_LIMIT;
use crate::pipeline::{Pipeline, PipelineConfig, DEFAULT_GRADE, DEFAULT_SEASON};

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The grade is empty
    #[error("Invalid grade: '{0}'. Expected a grade such as 9, 10, 11 or 12")]
    InvalidGrade(String),

    /// The season id is not numeric
    #[error("Invalid season: '{0}'. Expected the numeric sub-season id from roster URLs")]
    InvalidSeason(String),
}

/// How the finished leaderboard is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Full-screen terminal view
    #[default]
    Tui,
    /// Plain text table on stdout
    Table,
    /// JSON document on stdout
    Json,
}

/// rosterboard - rank a grade cohort by season scoring
#[derive(Parser, Debug)]
#[command(name = "rosterboard")]
#[command(about = "Season scoring leaders for one grade, merged from the stats feed and team rosters")]
#[command(version)]
pub struct Cli {
    /// Grade to rank, as printed on roster pages
    #[arg(long, default_value = DEFAULT_GRADE)]
    pub grade: String,

    /// Number of players to show
    #[arg(long, default_value_t = DEFAULT_LIMIT as u16, value_parser = clap::value_parser!(u16).range(1..=1000))]
    pub limit: u16,

    /// Sub-season id used in roster URLs
    #[arg(long, default_value = DEFAULT_SEASON)]
    pub season: String,

    /// Season stats feed URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_STATS_URL)]
    pub stats_url: String,

    /// Base URL of the roster site
    #[arg(long, value_name = "URL", default_value = DEFAULT_ROSTER_BASE_URL)]
    pub roster_url: String,

    /// Directory for cached rosters (defaults to the XDG cache directory)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Ignore and don't write the roster cache
    #[arg(long)]
    pub no_cache: bool,

    /// Pace roster requests for slow or mobile connections
    #[arg(long)]
    pub constrained: bool,

    /// How to show the result
    #[arg(long, value_enum, default_value_t = OutputFormat::Tui)]
    pub output: OutputFormat,

    /// Log level when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Validated settings for one invocation
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub pipeline: PipelineConfig,
    pub stats_url: String,
    pub roster_url: String,
    pub cache_dir: Option<PathBuf>,
    pub use_cache: bool,
    pub throttle: ThrottleProfile,
    pub output: OutputFormat,
    pub log_level: String,
}

impl RunConfig {
    /// Creates a RunConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(RunConfig)` with validated settings
    /// * `Err(CliError)` if the grade or season is malformed
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let grade = cli.grade.trim();
        if grade.is_empty() {
            return Err(CliError::InvalidGrade(cli.grade.clone()));
        }

        let season = cli.season.trim();
        if season.is_empty() || !season.chars().all(|c| c.is_ascii_digit()) {
            return Err(CliError::InvalidSeason(cli.season.clone()));
        }

        Ok(RunConfig {
            pipeline: PipelineConfig {
                season: season.to_string(),
                grade: grade.to_string(),
                limit: usize::from(cli.limit),
            },
            stats_url: cli.stats_url.clone(),
            roster_url: cli.roster_url.clone(),
            cache_dir: cli.cache_dir.clone(),
            use_cache: !cli.no_cache,
            throttle: if cli.constrained {
                ThrottleProfile::Constrained
            } else {
                ThrottleProfile::Standard
            },
            output: cli.output,
            log_level: cli.log_level.clone(),
        })
    }

    /// Roster cache to use, if caching is enabled and a location is known
    pub fn cache(&self) -> Option<CacheManager> {
        if !self.use_cache {
            return None;
        }
        match &self.cache_dir {
            Some(dir) => Some(CacheManager::with_dir(dir.clone())),
            None => CacheManager::new(),
        }
    }

    /// Builds the pipeline described by this configuration
    pub fn build_pipeline(&self) -> Pipeline {
        let acquirer = RosterAcquirer::new(
            RosterClient::with_base_url(self.roster_url.clone()),
            self.cache(),
        )
        .with_throttle(self.throttle);

        Pipeline::new(
            StatsClient::with_url(self.stats_url.clone()),
            acquirer,
            self.pipeline.clone(),
        )
    }
}
