//! rosterboard library
//!
//! The leaderboard pipeline and its pieces, exposed for the binary and for
//! integration tests.

pub mod acquire;
pub mod cache;
pub mod cli;
pub mod data;
pub mod leaderboard;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod render;
