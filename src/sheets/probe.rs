use crate::sheets::{FetchError, GOOGLE_SHEETS_BASE, is_html_page};
use serde::Serialize;
use std::time::Duration;

const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub spreadsheet_id: String,
    pub base_url: String,
    pub results: Vec<UrlProbe>,
}

/// Outcome of requesting one diagnostic url. `looks_like_csv` is only set for 200 responses.
#[derive(Debug, Default, Serialize)]
pub struct UrlProbe {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub looks_like_csv: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn probe_urls(spreadsheet_id: &str) -> Vec<String> {
    let base = format!("{GOOGLE_SHEETS_BASE}/{spreadsheet_id}");
    vec![
        format!("{base}/export?format=csv&gid=0"),
        format!("{base}/pub?gid=0&single=true&output=csv"),
        format!("{base}/gviz/tq?tqx=out:csv"),
        format!("{base}/edit#gid=0"),
    ]
}

/// Requests every diagnostic url of the spreadsheet and reports what came back. Request
/// failures are recorded in the report, not returned.
pub async fn probe(spreadsheet_id: &str, timeout: Duration) -> Result<ProbeReport, FetchError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;

    let mut results = Vec::new();
    for url in probe_urls(spreadsheet_id) {
        let outcome = match client.get(&url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => summarize(url, status, &body),
                    Err(e) => UrlProbe {
                        url,
                        status: Some(status),
                        error: Some(e.to_string()),
                        ..Default::default()
                    },
                }
            }
            Err(e) => UrlProbe {
                url,
                error: Some(e.to_string()),
                ..Default::default()
            },
        };

        tracing::debug!(url = %outcome.url, status = ?outcome.status, "probed sheet url");
        results.push(outcome);
    }

    Ok(ProbeReport {
        spreadsheet_id: spreadsheet_id.to_string(),
        base_url: format!("{GOOGLE_SHEETS_BASE}/{spreadsheet_id}/export"),
        results,
    })
}

fn summarize(url: String, status: u16, body: &str) -> UrlProbe {
    UrlProbe {
        url,
        status: Some(status),
        length: Some(body.len()),
        preview: Some(body.chars().take(PREVIEW_CHARS).collect()),
        looks_like_csv: (status == 200).then(|| !is_html_page(body.trim())),
        error: None,
    }
}
