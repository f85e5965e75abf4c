use std::fmt;

use scraper::{Html, Selector};
use watch_logging::watch_debug;
use watcher_core::RawRecord;

use crate::config::{Credentials, ExtractSelectors, HttpSettings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractError {
    pub kind: FailureKind,
    pub message: String,
}

impl ExtractError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    LoginRejected,
    MarkupMismatch,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::LoginRejected => write!(f, "login rejected"),
            FailureKind::MarkupMismatch => write!(f, "markup mismatch"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Produces the current run's raw records. May legitimately return zero
/// records; only a failure to reach or read the page is an error.
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawRecord>, ExtractError>;
}

/// Logs into the job portal and scrapes the listing cards from the home
/// page.
pub struct PortalExtractor {
    login_url: String,
    home_url: String,
    credentials: Credentials,
    selectors: ExtractSelectors,
    http: HttpSettings,
}

impl PortalExtractor {
    pub fn new(
        login_url: impl Into<String>,
        home_url: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            login_url: login_url.into(),
            home_url: home_url.into(),
            credentials,
            selectors: ExtractSelectors::default(),
            http: HttpSettings::default(),
        }
    }

    pub fn with_selectors(mut self, selectors: ExtractSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    pub fn with_http_settings(mut self, http: HttpSettings) -> Self {
        self.http = http;
        self
    }

    fn build_client(&self) -> Result<reqwest::Client, ExtractError> {
        // The cookie store carries the portal session from login to the
        // listings request.
        reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(self.http.connect_timeout)
            .timeout(self.http.request_timeout)
            .build()
            .map_err(|err| ExtractError::new(FailureKind::Network, err.to_string()))
    }

    async fn login(&self, client: &reqwest::Client) -> Result<(), ExtractError> {
        let url = reqwest::Url::parse(&self.login_url)
            .map_err(|err| ExtractError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = client
            .post(url)
            .form(&[
                ("email", self.credentials.username.as_str()),
                ("password", self.credentials.password.as_str()),
            ])
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::new(FailureKind::LoginRejected, status.to_string()));
        }
        Ok(())
    }

    async fn fetch_listings_page(&self, client: &reqwest::Client) -> Result<String, ExtractError> {
        let url = reqwest::Url::parse(&self.home_url)
            .map_err(|err| ExtractError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        response.text().await.map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl Extractor for PortalExtractor {
    async fn extract(&self) -> Result<Vec<RawRecord>, ExtractError> {
        let client = self.build_client()?;
        self.login(&client).await?;
        let html = self.fetch_listings_page(&client).await?;
        let records = parse_records(&html, &self.selectors)?;
        watch_debug!("extracted {} listing cards", records.len());
        Ok(records)
    }
}

/// Pulls `{header, body}` records out of the listings page markup.
///
/// A card missing its header or body is skipped rather than failing the
/// extraction, so one malformed card never hides the rest of the page.
/// Zero matching cards is a valid empty extraction.
pub fn parse_records(html: &str, selectors: &ExtractSelectors) -> Result<Vec<RawRecord>, ExtractError> {
    let card = parse_selector(&selectors.card)?;
    let header = parse_selector(&selectors.header)?;
    let body = parse_selector(&selectors.body)?;

    let document = Html::parse_document(html);
    let mut records = Vec::new();
    for element in document.select(&card) {
        let header_text = select_text(element, &header);
        let body_text = select_text(element, &body);
        match (header_text, body_text) {
            (Some(header), Some(body)) => records.push(RawRecord { header, body }),
            _ => watch_debug!("skipping card without header or body"),
        }
    }
    Ok(records)
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|err| {
        ExtractError::new(
            FailureKind::MarkupMismatch,
            format!("invalid selector {selector:?}: {err}"),
        )
    })
}

fn select_text(element: scraper::ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|node| node.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

fn map_reqwest_error(err: reqwest::Error) -> ExtractError {
    if err.is_timeout() {
        return ExtractError::new(FailureKind::Timeout, err.to_string());
    }
    ExtractError::new(FailureKind::Network, err.to_string())
}
