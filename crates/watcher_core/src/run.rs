use std::fmt;

/// Stages a single run moves through, in order. `Failed` is terminal and
/// reachable from `Extracting` and `Persisting` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Idle,
    Extracting,
    Diffing,
    Notifying,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Idle => "idle",
            RunStage::Extracting => "extracting",
            RunStage::Diffing => "diffing",
            RunStage::Notifying => "notifying",
            RunStage::Persisting => "persisting",
            RunStage::Done => "done",
            RunStage::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// Outcome of a completed run, reported to the surrounding scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunResult {
    /// Listings notified for the first time this run.
    pub new_count: usize,
    /// Notifications that could not be delivered. Never fatal.
    pub delivery_failures: usize,
}
