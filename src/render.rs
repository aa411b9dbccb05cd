//! Text renderings of a leaderboard for non-interactive output

use chrono::{DateTime, Local, Utc};

use crate::leaderboard::Leaderboard;

/// Column headings, in display order
pub const COLUMNS: [&str; 8] = ["Rank", "Name", "Team", "Pos", "GP", "G", "A", "PTS"];

/// "Last updated" line in local time
pub fn last_updated_line(last_updated: Option<DateTime<Utc>>) -> String {
    match last_updated {
        Some(ts) => format!(
            "Last updated: {}",
            ts.with_timezone(&Local).format("%b %-d, %Y %-I:%M %p")
        ),
        None => "Last updated: unknown".to_string(),
    }
}

/// One display row per ranked player, rank first
pub fn table_rows(board: &Leaderboard) -> Vec<[String; 8]> {
    board
        .players
        .iter()
        .enumerate()
        .map(|(i, p)| {
            [
                (i + 1).to_string(),
                p.name.clone(),
                p.team.clone(),
                p.position.clone(),
                p.games_played.to_string(),
                p.goals.to_string(),
                p.assists.to_string(),
                p.points.to_string(),
            ]
        })
        .collect()
}

/// Fixed-width text table with title and freshness line
pub fn format_table(board: &Leaderboard) -> String {
    let rows = table_rows(board);

    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&board.title);
    out.push('\n');
    out.push_str(&last_updated_line(board.last_updated));
    out.push_str("\n\n");

    let header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }

    if rows.is_empty() {
        out.push_str(&format!("No grade {} players found.\n", board.grade));
    }
    if !board.failed_teams.is_empty() {
        out.push_str(&format!(
            "\n{} team roster(s) could not be loaded: {}\n",
            board.failed_teams.len(),
            board.failed_teams.join(", ")
        ));
    }
    out
}

/// Numbers right-aligned, text left-aligned
fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(col, (cell, width))| match col {
            1..=3 => format!("{:<width$}", cell, width = width),
            _ => format!("{:>width$}", cell, width = width),
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
