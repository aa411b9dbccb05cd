//! Core data models for rosterboard
//!
//! This module contains the records read from the season feed and the roster
//! pages, plus the merged rows handed to renderers.

pub mod roster;
pub mod roster_page;
pub mod stats;

pub use roster::{RosterClient, RosterError};
pub use roster_page::{parse_roster_page, ParseError};
pub use stats::{StatsClient, StatsError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// One player's season line from the stats feed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatRecord {
    /// Roster-site player id; the join key. Empty when the feed has none.
    #[serde(default, deserialize_with = "deserialize_id")]
    pub player_id: String,
    /// Roster-site team id
    #[serde(default, deserialize_with = "deserialize_id")]
    pub team_id: String,
    /// Player display name
    #[serde(default)]
    pub name: String,
    /// Short team name as printed in the feed
    #[serde(default)]
    pub team_name: String,
    /// Games played
    #[serde(default, rename = "gp", deserialize_with = "deserialize_count")]
    pub games_played: u32,
    /// Goals scored
    #[serde(default, deserialize_with = "deserialize_count")]
    pub goals: u32,
    /// Assists
    #[serde(default, deserialize_with = "deserialize_count")]
    pub assists: u32,
    /// Goals plus assists
    #[serde(default, deserialize_with = "deserialize_count")]
    pub points: u32,
}

/// Roster metadata for one player, taken from a row of the roster table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Jersey number as printed
    pub number: String,
    /// Position abbreviation (e.g. "F", "D", "G")
    pub position: String,
    /// School grade (e.g. "9")
    pub grade: String,
}

/// A team's parsed roster page; the unit stored in the cache
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamRoster {
    /// Team display name from the page heading, empty if none was found
    #[serde(rename = "teamName", default)]
    pub team_name: String,
    /// Roster entries keyed by player id
    #[serde(rename = "data", default)]
    pub players: HashMap<String, RosterEntry>,
}

/// The full season feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonStats {
    /// Player lines in feed order
    pub players: Vec<StatRecord>,
    /// When the feed was last regenerated, if it says
    pub last_updated: Option<DateTime<Utc>>,
}

impl SeasonStats {
    /// Distinct non-empty team ids, in order of first appearance
    pub fn team_ids(&self) -> Vec<String> {
        let mut team_ids: Vec<String> = Vec::new();
        for player in &self.players {
            if !player.team_id.is_empty() && !team_ids.contains(&player.team_id) {
                team_ids.push(player.team_id.clone());
            }
        }
        team_ids
    }
}

/// A stat line joined with its roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedPlayer {
    /// Player display name from the feed
    pub name: String,
    /// Team name from the roster page, or the feed's when the page had none
    pub team: String,
    /// Position from the roster
    pub position: String,
    /// Grade from the roster
    pub grade: String,
    /// Season totals from the feed
    pub games_played: u32,
    pub goals: u32,
    pub assists: u32,
    /// Goals plus assists; the ranking key
    pub points: u32,
}

/// Accepts ids written either as JSON strings or numbers
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(text)) => text.trim().to_string(),
        Some(RawId::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

/// Accepts counts written as numbers, numeric strings, or null
///
/// Null, negative and non-numeric values read as 0 so one odd line cannot
/// sink the whole feed; fractional values are truncated.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Whole(u64),
        Fraction(f64),
        Text(String),
        Other(serde_json::Value),
    }

    let count = match Option::<RawCount>::deserialize(deserializer)? {
        Some(RawCount::Whole(n)) => u32::try_from(n).unwrap_or(u32::MAX),
        Some(RawCount::Fraction(f)) if f.is_finite() && f > 0.0 => f.min(f64::from(u32::MAX)) as u32,
        Some(RawCount::Text(text)) => text.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    };
    Ok(count)
}
