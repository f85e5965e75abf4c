use thiserror::Error;
use watcher_core::Notification;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("chat api rejected message: http status {0}")]
    HttpStatus(u16),
    #[error("network error: {0}")]
    Network(String),
}

/// Delivers one message. Failures are reported to the caller, which logs
/// and counts them; they never abort a run.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Sends messages through the Telegram Bot API.
pub struct TelegramNotifier {
    token: String,
    chat_id: String,
    base_url: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self::with_base_url(token, chat_id, TELEGRAM_API_BASE)
    }

    /// Overridable API base, used by tests to point at a local server.
    pub fn with_base_url(
        token: impl Into<String>,
        chat_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            chat_id: chat_id.into(),
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| NotifyError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}

/// Message for one newly-detected listing, linking back to the portal.
pub fn format_new_listing(notification: &Notification, home_url: &str) -> String {
    format!(
        "\u{1f195} *New job posted*\n\n*{}*\n{}\n\n[Find more details here]({})",
        notification.header, notification.body, home_url
    )
}

/// Heartbeat sent when a run found nothing new, so a silent run is
/// distinguishable from a run that never happened.
pub fn format_heartbeat() -> String {
    "Nothing new here \u{1f642}".to_string()
}
