//! Watcher core: pure listing comparison logic.
//!
//! Nothing in this crate performs I/O. The normalizer and the diff engine
//! are deterministic functions so that a run can be replayed in tests
//! against in-memory fixtures.
mod diff;
mod normalize;
mod run;

pub use diff::{diff, DiffOutcome, Notification, RawRecord, SeenSet};
pub use normalize::{NormalizeRules, Normalizer};
pub use run::{RunResult, RunStage};
