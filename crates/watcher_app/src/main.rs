//! One-shot job-listing watcher.
//!
//! Logs into the portal, diffs the listings against the persisted seen
//! set and sends one chat message per new listing. Intended to be run
//! periodically by an external scheduler; the scheduler is expected to
//! serialize invocations so that runs never overlap.

mod logging;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use watch_logging::{watch_error, watch_info};
use watcher_core::{NormalizeRules, Normalizer};
use watcher_engine::{Credentials, Orchestrator, PortalExtractor, TelegramNotifier, WatchConfig};

struct AppEnv {
    credentials: Credentials,
    telegram_token: String,
    telegram_chat_id: String,
    data_file_path: Option<PathBuf>,
}

fn main() -> ExitCode {
    // A missing .env file is fine; the variables may come from the
    // real environment.
    let _ = dotenvy::dotenv();
    logging::initialize();

    let app_env = match read_env() {
        Ok(app_env) => app_env,
        Err(name) => {
            watch_error!("missing required environment variable {name}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = WatchConfig::default();
    if let Some(path) = app_env.data_file_path {
        config.data_file_path = path;
    }

    let normalizer = match Normalizer::new(NormalizeRules::default()) {
        Ok(normalizer) => normalizer,
        Err(err) => {
            watch_error!("normalization rules failed to compile: {err}");
            return ExitCode::FAILURE;
        }
    };

    let extractor = PortalExtractor::new(
        config.login_url.clone(),
        config.home_url.clone(),
        app_env.credentials,
    );
    let notifier = TelegramNotifier::new(app_env.telegram_token, app_env.telegram_chat_id);
    let orchestrator = Orchestrator::new(
        config,
        normalizer,
        Box::new(extractor),
        Box::new(notifier),
    );

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            watch_error!("failed to start async runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(orchestrator.run()) {
        Ok(result) => {
            watch_info!(
                "run complete: {} new listings, {} delivery failures",
                result.new_count,
                result.delivery_failures
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            watch_error!("run failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn read_env() -> Result<AppEnv, &'static str> {
    Ok(AppEnv {
        credentials: Credentials {
            username: require("SUP_USER")?,
            password: require("SUP_PASS")?,
        },
        telegram_token: require("TELEGRAM_TOKEN")?,
        telegram_chat_id: require("TELEGRAM_CHAT_ID")?,
        data_file_path: env::var("WATCHER_DATA_FILE").ok().map(PathBuf::from),
    })
}

fn require(name: &'static str) -> Result<String, &'static str> {
    env::var(name).map_err(|_| name)
}
