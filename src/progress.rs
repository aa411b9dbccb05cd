//! Progress reporting for a pipeline run
//!
//! Frontends implement [`Progress`] to surface loading status to users.

/// Receives loading status while the pipeline runs
pub trait Progress {
    /// Free-form status line for human eyes.
    fn status(&mut self, _message: &str) {}

    /// Called after every team, whether its roster loaded or failed.
    fn teams_done(&mut self, _done: usize, _total: usize) {}

    /// Called once at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Records everything it is told; handy for tests and for replaying status lines
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingProgress {
    pub messages: Vec<String>,
    pub team_counts: Vec<(usize, usize)>,
    pub finished: bool,
}

impl Progress for RecordingProgress {
    fn status(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn teams_done(&mut self, done: usize, total: usize) {
        self.team_counts.push((done, total));
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}
