//! Joining stats with rosters and ranking the result
//!
//! [`RosterIndex`] is the per-run accumulator that flattens every acquired
//! roster into one player-id lookup. [`merge`] joins the season feed against
//! it and keeps one grade; [`rank`] orders by points and cuts the list.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::data::{MergedPlayer, RosterEntry, StatRecord, TeamRoster};

/// Default number of players shown
pub const DEFAULT_LIMIT: usize = 100;

/// Player-id lookup over all rosters acquired in a run
#[derive(Debug, Default)]
pub struct RosterIndex<'a> {
    entries: HashMap<&'a str, &'a RosterEntry>,
    team_names: HashMap<&'a str, &'a str>,
    duplicates: Vec<&'a str>,
}

impl<'a> RosterIndex<'a> {
    /// Flattens rosters in acquisition order
    ///
    /// A player id listed by more than one team resolves to the last roster
    /// that lists it; such ids are kept in [`RosterIndex::duplicate_ids`].
    pub fn build(rosters: &'a [(String, TeamRoster)]) -> Self {
        let mut index = Self::default();

        for (team_id, roster) in rosters {
            if !roster.team_name.is_empty() {
                index.team_names.insert(team_id.as_str(), roster.team_name.as_str());
            }
            for (player_id, entry) in &roster.players {
                if index.entries.insert(player_id.as_str(), entry).is_some() {
                    warn!(player_id = %player_id, team_id = %team_id, "player appears on more than one roster");
                    index.duplicates.push(player_id.as_str());
                }
            }
        }

        index
    }

    /// Roster entry for a player id
    pub fn entry(&self, player_id: &str) -> Option<&'a RosterEntry> {
        self.entries.get(player_id).copied()
    }

    /// Non-empty team name resolved from a team's roster page
    pub fn team_name(&self, team_id: &str) -> Option<&'a str> {
        self.team_names.get(team_id).copied()
    }

    /// Player ids that appeared on more than one roster
    pub fn duplicate_ids(&self) -> &[&'a str] {
        &self.duplicates
    }

    /// Number of distinct player ids indexed
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no roster contributed a player
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Joins stat lines with roster entries, keeping only the given grade
///
/// Output follows feed order. Stat lines without a player id, without a
/// roster entry, or with a different grade are dropped.
pub fn merge(stats: &[StatRecord], index: &RosterIndex<'_>, grade: &str) -> Vec<MergedPlayer> {
    stats
        .iter()
        .filter(|stat| !stat.player_id.is_empty())
        .filter_map(|stat| {
            let entry = index.entry(&stat.player_id)?;
            if entry.grade != grade {
                return None;
            }

            let team = index
                .team_name(&stat.team_id)
                .map(str::to_string)
                .unwrap_or_else(|| stat.team_name.clone());

            Some(MergedPlayer {
                name: stat.name.clone(),
                team,
                position: entry.position.clone(),
                grade: entry.grade.clone(),
                games_played: stat.games_played,
                goals: stat.goals,
                assists: stat.assists,
                points: stat.points,
            })
        })
        .collect()
}

/// Orders by points, highest first, and keeps the first `limit`
///
/// The sort is stable, so players on equal points keep their merge order.
pub fn rank(mut players: Vec<MergedPlayer>, limit: usize) -> Vec<MergedPlayer> {
    players.sort_by(|a, b| b.points.cmp(&a.points));
    players.truncate(limit);
    players
}

/// Leaderboard heading for a grade, e.g. "Top 100 Freshman Scoring Leaders"
pub fn cohort_title(grade: &str, limit: usize) -> String {
    let cohort = match grade {
        "9" => "Freshman".to_string(),
        "10" => "Sophomore".to_string(),
        "11" => "Junior".to_string(),
        "12" => "Senior".to_string(),
        other => format!("Grade {}", other),
    };
    format!("Top {} {} Scoring Leaders", limit, cohort)
}

/// The ranked result of one pipeline run, as handed to renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub title: String,
    pub grade: String,
    /// Ranked players, at most the configured limit
    pub players: Vec<MergedPlayer>,
    /// Players of the grade found before truncation
    pub eligible: usize,
    /// Freshness of the season feed
    pub last_updated: Option<DateTime<Utc>>,
    /// Teams whose roster could not be loaded
    pub failed_teams: Vec<String>,
}
