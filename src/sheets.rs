//! Remote spreadsheet access.
//!
//! A logical table ("Items", "Recipes") is fetched by trying an ordered list of [`SheetSource`]
//! strategies; the first one that yields a usable table wins. When every strategy fails for the
//! logical name, the same chain is retried for each alternate sheet name. Failures are logged and
//! never propagated: the caller only learns whether a table was found.

use crate::store::Table;
use crate::store::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

mod google;
mod probe;

pub use google::{GOOGLE_SHEETS_BASE, GoogleSheetSource, GoogleSheetUrl};
pub use probe::{ProbeReport, UrlProbe, probe, probe_urls};

/// Public sheet the service was originally seeded from
pub const DEFAULT_SPREADSHEET_ID: &str = "1RXXaxbOCtlsOdPDTOhL5R4Wjnrct1jBOaueNSj10Rys";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("empty response")]
    EmptyBody,

    /// Typically an access or permission page served instead of the export
    #[error("received an HTML page instead of sheet data")]
    HtmlPage,

    #[error("unparseable sheet data: {0}")]
    Parse(#[from] StoreError),

    #[error("no meaningful data")]
    NoData,

    #[error("invalid url: {0}")]
    Url(String),
}

/// One way of retrieving a sheet as a table.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Where this source would look for `sheet`, for logging
    fn describe(&self, sheet: &str) -> String;

    async fn fetch(&self, sheet: &str) -> Result<Table, FetchError>;
}

/// Validates a sheet export body and turns it into a cleaned table.
pub fn parse_sheet_body(body: &str) -> Result<Table, FetchError> {
    let content = body.trim();
    if content.is_empty() {
        return Err(FetchError::EmptyBody);
    }
    if is_html_page(content) {
        return Err(FetchError::HtmlPage);
    }

    let table = Table::from_csv_str(content)?.drop_empty();
    if table.is_empty() {
        return Err(FetchError::NoData);
    }
    Ok(table)
}

pub(crate) fn is_html_page(content: &str) -> bool {
    let head: String = content.chars().take(15).collect::<String>().to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

/// Turns a fetched table into the caller's records. A table it rejects counts as a failed attempt,
/// so the chain moves on to the next source.
pub type Decode<'a, R> = &'a (dyn Fn(&Table) -> Result<R, StoreError> + Sync);

/// Tries each source in order and returns the first non-empty table that `decode` accepts.
pub async fn first_success<R>(sources: &[Arc<dyn SheetSource>], sheet: &str, decode: Decode<'_, R>) -> Option<R> {
    for (idx, source) in sources.iter().enumerate() {
        let attempt = idx + 1;
        tracing::debug!(sheet, attempt, source = %source.describe(sheet), "trying sheet source");

        let outcome = source.fetch(sheet).await.and_then(|table| {
            if table.is_empty() {
                return Err(FetchError::NoData);
            }
            let decoded = decode(&table)?;
            tracing::info!(sheet, attempt, rows = table.len(), columns = table.width(), "sheet loaded");
            Ok(decoded)
        });

        match outcome {
            Ok(decoded) => return Some(decoded),
            Err(e) => tracing::warn!(sheet, attempt, error = %e, "sheet source failed"),
        }
    }

    tracing::warn!(sheet, "all sheet sources failed");
    None
}

pub struct RemoteSheetFetcher {
    sources: Vec<Arc<dyn SheetSource>>,
    alternates: HashMap<String, Vec<String>>,
}

impl RemoteSheetFetcher {
    pub fn new(sources: Vec<Arc<dyn SheetSource>>) -> Self {
        let mut alternates = HashMap::new();
        alternates.insert("Items".to_string(), vec!["ItemsRecipies".to_string(), "Sheet1".to_string()]);
        alternates.insert("Recipes".to_string(), vec!["ItemsRecipies".to_string(), "Sheet2".to_string()]);

        Self { sources, alternates }
    }

    /// Fetcher over the three public export endpoints of a Google spreadsheet
    pub fn google(spreadsheet_id: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let sources = GoogleSheetUrl::ALL
            .into_iter()
            .map(|format| {
                Arc::new(GoogleSheetSource::new(client.clone(), spreadsheet_id, format)) as Arc<dyn SheetSource>
            })
            .collect();

        Ok(Self::new(sources))
    }

    pub fn with_alternates(mut self, logical: &str, names: &[&str]) -> Self {
        self.alternates
            .insert(logical.to_string(), names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn alternates(&self, logical: &str) -> &[String] {
        self.alternates.get(logical).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fetches `logical`, falling back to its alternate sheet names. `None` when nothing worked.
    pub async fn fetch<R>(&self, logical: &str, decode: Decode<'_, R>) -> Option<R> {
        if let Some(decoded) = first_success(&self.sources, logical, decode).await {
            return Some(decoded);
        }

        for alt in self.alternates(logical) {
            tracing::debug!(sheet = logical, alternate = %alt, "trying alternate sheet name");
            if let Some(decoded) = first_success(&self.sources, alt, decode).await {
                return Some(decoded);
            }
        }

        tracing::warn!(sheet = logical, "could not read sheet from remote source");
        None
    }
}
