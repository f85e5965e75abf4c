//! Watcher engine: collaborators and the run pipeline.
mod config;
mod extract;
mod notify;
mod orchestrator;
mod store;

pub use config::{Credentials, ExtractSelectors, HttpSettings, WatchConfig};
pub use extract::{parse_records, ExtractError, Extractor, FailureKind, PortalExtractor};
pub use notify::{format_heartbeat, format_new_listing, Notifier, NotifyError, TelegramNotifier};
pub use orchestrator::{Orchestrator, RunError};
pub use store::{SeenStore, StoreError, StoredState};
