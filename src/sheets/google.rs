use crate::sheets::{FetchError, SheetSource, parse_sheet_body};
use crate::store::Table;
use async_trait::async_trait;
use reqwest::{Client, Url};

pub const GOOGLE_SHEETS_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// Export endpoints of a public Google spreadsheet, in the order they are tried.
///
/// Only the gviz endpoint can address a sheet by name; the other two always export the first
/// sheet (`gid=0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoogleSheetUrl {
    CsvExport,
    GvizQuery,
    PublishedCsv,
}

impl GoogleSheetUrl {
    pub const ALL: [GoogleSheetUrl; 3] = [
        GoogleSheetUrl::CsvExport,
        GoogleSheetUrl::GvizQuery,
        GoogleSheetUrl::PublishedCsv,
    ];

    pub fn url(&self, spreadsheet_id: &str, sheet: &str) -> Result<Url, FetchError> {
        let base = format!("{GOOGLE_SHEETS_BASE}/{spreadsheet_id}");
        let parsed = match self {
            GoogleSheetUrl::CsvExport => {
                Url::parse_with_params(&format!("{base}/export"), &[("format", "csv"), ("gid", "0")])
            }
            GoogleSheetUrl::GvizQuery => {
                Url::parse_with_params(&format!("{base}/gviz/tq"), &[("tqx", "out:csv"), ("sheet", sheet)])
            }
            GoogleSheetUrl::PublishedCsv => Url::parse_with_params(
                &format!("{base}/pub"),
                &[("gid", "0"), ("single", "true"), ("output", "csv")],
            ),
        };

        parsed.map_err(|e| FetchError::Url(e.to_string()))
    }
}

pub struct GoogleSheetSource {
    client: Client,
    spreadsheet_id: String,
    format: GoogleSheetUrl,
}

impl GoogleSheetSource {
    pub fn new(client: Client, spreadsheet_id: &str, format: GoogleSheetUrl) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.to_string(),
            format,
        }
    }
}

#[async_trait]
impl SheetSource for GoogleSheetSource {
    fn describe(&self, sheet: &str) -> String {
        match self.format.url(&self.spreadsheet_id, sheet) {
            Ok(url) => url.to_string(),
            Err(e) => format!("{:?} ({e})", self.format),
        }
    }

    async fn fetch(&self, sheet: &str) -> Result<Table, FetchError> {
        let url = self.format.url(&self.spreadsheet_id, sheet)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_sheet_body(&body)
    }
}
