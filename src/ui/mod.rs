//! UI rendering module for rosterboard
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod leaderboard;
pub mod status;

pub use help_overlay::render as render_help_overlay;
pub use leaderboard::render_leaderboard;
pub use status::{render_error, render_loading};
