//! Loading and error screens
//!
//! Both are a single centered message; the loading screen shows the latest
//! progress status from the pipeline.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Renders a loading message while data is being fetched
pub fn render_loading(frame: &mut Frame, message: &str) {
    let area = centered_band(frame.area(), 3);

    let loading_text = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, area);
}

/// Renders the failure message of a run that produced no result
pub fn render_error(frame: &mut Frame, message: &str) {
    let area = centered_band(frame.area(), 5);

    let lines = vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::styled("Press q to quit", Style::default().fg(Color::DarkGray)),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Error ");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Full-width band of `height` rows, centered vertically
fn centered_band(area: Rect, height: u16) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(height),
            Constraint::Percentage(45),
        ])
        .split(area);
    chunks[1]
}
