//! Roster page extraction
//!
//! Turns the HTML of a team's roster page into a [`TeamRoster`]. Pure: no
//! network or cache access, so it can be exercised against fixture pages.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

use super::{RosterEntry, TeamRoster};

/// Jersey number printed for managers and other non-playing staff
pub const STAFF_MARKER: &str = "MGR";

/// Path segment that precedes the numeric player id in player links
const PLAYER_LINK_MARKER: &str = "roster_players/";

/// Rows with fewer cells are not player rows
const MIN_ROW_CELLS: usize = 5;

const NUMBER_CELL: usize = 0;
const NAME_CELL: usize = 2;
const POSITION_CELL: usize = 3;
const GRADE_CELL: usize = 4;

/// An extraction selector could not be compiled
#[derive(Debug, Error)]
#[error("Invalid roster selector `{selector}`: {message}")]
pub struct ParseError {
    selector: &'static str,
    message: String,
}

fn selector(selector: &'static str) -> Result<Selector, ParseError> {
    Selector::parse(selector).map_err(|e| ParseError {
        selector,
        message: e.to_string(),
    })
}

/// Parses a roster page into the team name and its player entries
///
/// Missing structure degrades instead of failing: no heading gives an empty
/// team name, no table gives an empty roster.
pub fn parse_roster_page(html: &str) -> Result<TeamRoster, ParseError> {
    let document = Html::parse_document(html);

    let heading_selector = selector("h1.page-title, h1")?;
    let team_name = document
        .select(&heading_selector)
        .next()
        .map(|heading| clean_team_name(&heading.text().collect::<String>()))
        .unwrap_or_default();

    let row_selector = selector("table tbody tr")?;
    let cell_selector = selector("td")?;
    let link_selector = selector("a")?;

    let mut players = HashMap::new();
    for row in document.select(&row_selector) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() < MIN_ROW_CELLS {
            continue;
        }

        let number = cell_text(&cells[NUMBER_CELL]);
        if number == STAFF_MARKER {
            continue;
        }

        let player_id = cells[NAME_CELL]
            .select(&link_selector)
            .next()
            .and_then(|link| link.value().attr("href"))
            .and_then(player_id_from_href);
        let Some(player_id) = player_id else {
            debug!(number = %number, "skipping roster row without a player link");
            continue;
        };

        let entry = RosterEntry {
            number,
            position: cell_text(&cells[POSITION_CELL]),
            grade: cell_text(&cells[GRADE_CELL]),
        };
        if players.insert(player_id.clone(), entry).is_some() {
            debug!(player_id = %player_id, "player listed twice on one roster page");
        }
    }

    Ok(TeamRoster { team_name, players })
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Extracts the digits after `roster_players/` in a link target
fn player_id_from_href(href: &str) -> Option<String> {
    let start = href.find(PLAYER_LINK_MARKER)? + PLAYER_LINK_MARKER.len();
    let digits: String = href[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    (!digits.is_empty()).then_some(digits)
}

/// The "Roster" label as a whole word, with the whitespace around it
static ROSTER_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\broster\b\s*").expect("valid roster label regex"));

/// A `2025-2026` season range anywhere in the heading, with its whitespace
static SEASON_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\d{4}-\d{4}\s*").expect("valid season range regex"));

/// Brackets emptied by the removals above
static EMPTY_BRACKETS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\)|\[\s*\]").expect("valid bracket regex"));

/// Strips the "Roster" label and the season range from a page heading
///
/// "Eagles Roster 2025-2026" becomes "Eagles" and "Hawks Roster: 2025-2026"
/// becomes "Hawks:". Only the first occurrence of each is removed, and
/// whitespace is collapsed.
fn clean_team_name(heading: &str) -> String {
    let name = remove_first(&ROSTER_LABEL_RE, heading);
    let name = remove_first(&SEASON_RANGE_RE, &name);
    let name = EMPTY_BRACKETS_RE.replace_all(&name, " ");

    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts the first match out of `text`
///
/// A space is left behind only when the match separated a word from
/// whatever follows, so "Hawks Roster Kings" keeps its gap and
/// "Hawks Roster:" does not gain one.
fn remove_first(re: &Regex, text: &str) -> String {
    let Some(found) = re.find(text) else {
        return text.to_string();
    };

    let before = &text[..found.start()];
    let after = &text[found.end()..];
    let joiner = match after.chars().next() {
        Some(c) if !before.is_empty() && (c.is_alphanumeric() || c == '(' || c == '[') => " ",
        _ => "",
    };

    format!("{}{}{}", before, joiner, after)
}
