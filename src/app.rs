//! Application state management for the rosterboard terminal view
//!
//! This module contains the view state, handling keyboard input and the
//! transitions from loading to either the leaderboard or an error screen.

use crossterm::event::{KeyCode, KeyEvent};

use rosterboard::leaderboard::Leaderboard;
use rosterboard::pipeline::Presenter;

/// Rows moved by PageUp/PageDown
const PAGE_SIZE: usize = 10;

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Pipeline running; holds the latest status line
    Loading(String),
    /// Ranked table
    Leaderboard,
    /// The run produced no result
    Failed(String),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Result of the run, once available
    pub leaderboard: Option<Leaderboard>,
    /// Index of the highlighted row
    pub selected_index: usize,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
}

impl App {
    /// Creates a new App instance in the loading state
    pub fn new() -> Self {
        Self {
            state: AppState::Loading("Starting...".to_string()),
            leaderboard: None,
            selected_index: 0,
            should_quit: false,
            show_help: false,
        }
    }

    /// Number of ranked rows
    pub fn row_count(&self) -> usize {
        self.leaderboard.as_ref().map_or(0, |b| b.players.len())
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit (Esc closes the help overlay first)
    /// - `Up`/`k`, `Down`/`j`: Move the highlighted row
    /// - `PageUp`/`PageDown`: Move by a page
    /// - `g`/`Home`, `G`/`End`: Jump to the first/last row
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if self.show_help {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') if self.state == AppState::Leaderboard => {
                self.show_help = true;
                return;
            }
            _ => {}
        }

        if self.state != AppState::Leaderboard {
            return;
        }

        let last = self.row_count().saturating_sub(1);
        match key_event.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_index = (self.selected_index + 1).min(last);
            }
            KeyCode::PageUp => {
                self.selected_index = self.selected_index.saturating_sub(PAGE_SIZE);
            }
            KeyCode::PageDown => {
                self.selected_index = (self.selected_index + PAGE_SIZE).min(last);
            }
            KeyCode::Home | KeyCode::Char('g') => self.selected_index = 0,
            KeyCode::End | KeyCode::Char('G') => self.selected_index = last,
            _ => {}
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for App {
    fn show_error(&mut self, message: &str) {
        self.state = AppState::Failed(message.to_string());
    }

    fn show_leaderboard(&mut self, board: &Leaderboard) {
        self.leaderboard = Some(board.clone());
        self.selected_index = 0;
        self.state = AppState::Leaderboard;
    }
}
