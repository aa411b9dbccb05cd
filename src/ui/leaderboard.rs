//! Leaderboard screen rendering
//!
//! Renders the ranked table with a header line (title and feed freshness)
//! and a footer with key hints and roster failures.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use rosterboard::leaderboard::Leaderboard;
use rosterboard::render::{last_updated_line, table_rows, COLUMNS};

/// Column widths matching `COLUMNS`
const WIDTHS: [Constraint; 8] = [
    Constraint::Length(4),
    Constraint::Min(18),
    Constraint::Min(18),
    Constraint::Length(4),
    Constraint::Length(4),
    Constraint::Length(4),
    Constraint::Length(4),
    Constraint::Length(5),
];

/// Colour for the top three ranks
fn rank_color(rank: usize) -> Color {
    match rank {
        1 => Color::Yellow,
        2 => Color::White,
        3 => Color::LightRed,
        _ => Color::Gray,
    }
}

/// Renders the leaderboard screen
///
/// # Arguments
/// * `frame` - The ratatui Frame to render to
/// * `app` - The application state containing the leaderboard and selection
pub fn render_leaderboard(frame: &mut Frame, app: &App) {
    let Some(board) = app.leaderboard.as_ref() else {
        return;
    };
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title and freshness
            Constraint::Min(3),    // Table
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, board, chunks[0]);
    render_table(frame, board, app.selected_index, chunks[1]);
    render_footer(frame, board, chunks[2]);
}

fn render_header(frame: &mut Frame, board: &Leaderboard, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            board.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            last_updated_line(board.last_updated),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_table(frame: &mut Frame, board: &Leaderboard, selected: usize, area: Rect) {
    let header = Row::new(COLUMNS.iter().map(|c| Cell::from(*c)))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows = table_rows(board).into_iter().enumerate().map(|(i, cells)| {
        let style = if i % 2 == 0 {
            Style::default()
        } else {
            Style::default().fg(Color::Gray)
        };
        let rank = Cell::from(cells[0].clone()).style(
            Style::default()
                .fg(rank_color(i + 1))
                .add_modifier(Modifier::BOLD),
        );
        let rest = cells.into_iter().skip(1).map(Cell::from);
        Row::new(std::iter::once(rank).chain(rest)).style(style)
    });

    let table = Table::new(rows, WIDTHS)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Grade {} ", board.grade)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    if !board.players.is_empty() {
        state.select(Some(selected.min(board.players.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_footer(frame: &mut Frame, board: &Leaderboard, area: Rect) {
    let mut spans = vec![Span::styled(
        "j/k: Move  g/G: Top/Bottom  ?: Help  q: Quit",
        Style::default().fg(Color::DarkGray),
    )];

    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("{} of {} shown", board.players.len(), board.eligible),
        Style::default().fg(Color::DarkGray),
    ));

    if !board.failed_teams.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} roster(s) unavailable", board.failed_teams.len()),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
