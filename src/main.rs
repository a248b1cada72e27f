use anyhow::{Context, Result};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};
use unwanted_records::{config::Config, pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    // stdout carries the report only
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config = Config::from_env().context("reading configuration")?;
    info!(source = ?config.source, comp = config.competition.id, "configured");

    // ─── 3) scrape + compute records ─────────────────────────────────
    let report = match pipeline::run(&config).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "run failed");
            return Err(e).context("building unwanted records report");
        }
    };

    // ─── 4) print ────────────────────────────────────────────────────
    let rendered = report
        .render(config.format)
        .context("rendering report")?;
    println!("{rendered}");

    info!("all done");
    Ok(())
}
