use std::path::PathBuf;
use std::time::Duration;

/// Recognized watcher options, passed to the orchestrator at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Page carrying the login form.
    pub login_url: String,
    /// Page listing the job cards; also linked from every notification.
    pub home_url: String,
    /// Student profile page. Accepted for completeness, not driven by
    /// the extractor.
    pub profile_url: Option<String>,
    /// Where the seen-set snapshot lives.
    pub data_file_path: PathBuf,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            login_url: "https://app.joinsuperset.com/students/login".to_string(),
            home_url: "https://app.joinsuperset.com/students".to_string(),
            profile_url: None,
            data_file_path: PathBuf::from("jobs_seen.json"),
        }
    }
}

/// Portal login credentials. Read from the environment by the app;
/// never persisted or logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// CSS selectors that locate job cards on the listings page.
///
/// Defaults match the portal's current MUI markup; they are the piece
/// most likely to need adjustment when the page is restyled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSelectors {
    /// One match per job card.
    pub card: String,
    /// Listing title, relative to a card.
    pub header: String,
    /// Listing description, relative to a card.
    pub body: String,
}

impl Default for ExtractSelectors {
    fn default() -> Self {
        Self {
            card: "div.MuiBox-root.css-mfpd05".to_string(),
            header: ".flex.gap-4.items-center".to_string(),
            body: r".m-0.sm\:m-3.lg\:mt-4.lg\:mr-16.lg\:mb-5.lg\:ml-14".to_string(),
        }
    }
}

/// HTTP client tuning for the portal extractor.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}
