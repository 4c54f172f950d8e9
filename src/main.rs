use craftsheet::{Registry, config, net::http};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cfg = match std::env::var("CRAFTSHEET_CONFIG") {
        Ok(path) => config::Config::load(path)?,
        Err(_) => config::Config::from_env()?,
    };
    let registry = Arc::new(Registry::bootstrap(&cfg).await?);

    let addr: SocketAddr = cfg.http_addr.parse()?;
    http::serve(addr, registry).await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, prelude::*};

    color_eyre::install().map_err(|e| anyhow::anyhow!(e))?;

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info,craftsheet=debug"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::uptime()),
        )
        .with(tracing_error::ErrorLayer::default())
        .init();
    Ok(())
}
