use anyhow::Context;
use clap::Parser;
use craftsheet::config;
use craftsheet::sheets::probe;
use std::time::Duration;

// cargo run --bin probe-sheet -- --spreadsheet-id 1RXXaxbOCtlsOdPDTOhL5R4Wjnrct1jBOaueNSj10Rys

#[derive(Debug, Parser)]
#[command(name = "probe-sheet", version, about = "Check which public URLs of a spreadsheet are reachable")]
struct Args {
    /// Spreadsheet to probe (if omitted, use env/config)
    #[arg(long)]
    spreadsheet_id: Option<String>,

    /// Per request timeout, in seconds
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let cfg = config::Config::from_env()?;
    let spreadsheet_id = args.spreadsheet_id.unwrap_or(cfg.sheets.spreadsheet_id);

    let report = probe(&spreadsheet_id, Duration::from_secs(args.timeout_secs))
        .await
        .context("building HTTP client")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
