use thiserror::Error;
use watch_logging::{watch_error, watch_info, watch_warn};
use watcher_core::{diff, Normalizer, RunResult, RunStage};

use crate::config::WatchConfig;
use crate::extract::{ExtractError, Extractor};
use crate::notify::{format_heartbeat, format_new_listing, Notifier};
use crate::store::{SeenStore, StoreError};

#[derive(Debug, Error)]
pub enum RunError {
    /// The extractor could not produce records. The seen-store is left
    /// untouched so the next run re-detects anything missed.
    #[error("extraction failed: {0}")]
    Extraction(ExtractError),
    /// The seen-store write failed. Surfaced because silently losing the
    /// store would re-notify everything on the next run.
    #[error("persist failed: {0}")]
    Persist(#[from] StoreError),
}

/// Sequences one run: extract, diff, notify, persist.
pub struct Orchestrator {
    config: WatchConfig,
    normalizer: Normalizer,
    extractor: Box<dyn Extractor>,
    notifier: Box<dyn Notifier>,
    store: SeenStore,
}

impl Orchestrator {
    pub fn new(
        config: WatchConfig,
        normalizer: Normalizer,
        extractor: Box<dyn Extractor>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let store = SeenStore::new(config.data_file_path.clone());
        Self {
            config,
            normalizer,
            extractor,
            notifier,
            store,
        }
    }

    /// Executes one full run.
    ///
    /// Persistence happens after every successful extraction, regardless
    /// of delivery outcomes: a missed message can only be recovered by
    /// re-running against an unchanged store, while a lost store means
    /// mass re-notification. Only an extraction failure skips the persist.
    pub async fn run(&self) -> Result<RunResult, RunError> {
        let run_id = watch_logging::get_run_id() + 1;
        watch_logging::set_run_id(run_id);

        self.enter(RunStage::Extracting);
        let records = match self.extractor.extract().await {
            Ok(records) => records,
            Err(err) => {
                watch_error!("run {run_id}: extraction failed: {err}");
                self.enter(RunStage::Failed);
                return Err(RunError::Extraction(err));
            }
        };

        self.enter(RunStage::Diffing);
        let state = self.store.load(&self.normalizer);
        let outcome = diff(&records, &state.seen, &self.normalizer);
        watch_info!(
            "run {run_id}: {} records extracted, {} new, {} seen before",
            records.len(),
            outcome.notifications.len(),
            state.seen.len()
        );

        self.enter(RunStage::Notifying);
        let mut delivery_failures = 0;
        if outcome.notifications.is_empty() {
            if let Err(err) = self.notifier.send(&format_heartbeat()).await {
                watch_warn!("run {run_id}: heartbeat delivery failed: {err}");
                delivery_failures += 1;
            }
        } else {
            for notification in &outcome.notifications {
                let message = format_new_listing(notification, &self.config.home_url);
                if let Err(err) = self.notifier.send(&message).await {
                    watch_warn!(
                        "run {run_id}: delivery failed for {:?}: {err}",
                        notification.key
                    );
                    delivery_failures += 1;
                }
            }
        }

        self.enter(RunStage::Persisting);
        let mut contents = state.contents;
        for notification in &outcome.notifications {
            contents.insert(notification.key.clone(), notification.body.clone());
        }
        if let Err(err) = self.store.save(&outcome.updated_seen, &contents) {
            watch_error!("run {run_id}: persist failed: {err}");
            self.enter(RunStage::Failed);
            return Err(RunError::Persist(err));
        }

        self.enter(RunStage::Done);
        Ok(RunResult {
            new_count: outcome.notifications.len(),
            delivery_failures,
        })
    }

    fn enter(&self, stage: RunStage) {
        watch_info!("run {}: stage {stage}", watch_logging::get_run_id());
    }
}
