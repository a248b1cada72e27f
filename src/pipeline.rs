// src/pipeline.rs

use crate::config::{Config, PageSource};
use crate::error::{Result, ScrapeError};
use crate::fetch::{DirectoryFetcher, HttpFetcher, PageFetcher, WebDriverFetcher};
use crate::pages::{Competition, Page, PAGES};
use crate::records::{matchweek, UNWANTED_RECORDS};
use crate::report::{RecordLine, Report};
use crate::table::{extract, normalize, Table};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

/// Normalized tables keyed by table id.
pub type Tables = BTreeMap<String, Table>;

const STANDARD_TABLE: &str = "stats_standard";

/// Fetch, extract and normalize every page, one at a time.
#[instrument(level = "info", skip_all, fields(comp = competition.id))]
pub async fn scrape_tables<F: PageFetcher>(
    fetcher: &F,
    competition: &Competition,
    pages: &[Page],
) -> Result<Tables> {
    let mut tables = Tables::new();
    for page in pages {
        let url = competition.page_url(page)?;
        info!(%url, table_id = page.table_id, "scraping table");
        let html = fetcher.fetch(&url).await?;
        let table = normalize(extract(&html, page.table_id)?);
        info!(
            table_id = page.table_id,
            rows = table.len(),
            columns = table.columns().len(),
            "table ready"
        );
        tables.insert(page.table_id.to_string(), table);
    }
    Ok(tables)
}

fn table<'a>(tables: &'a Tables, table_id: &str) -> Result<&'a Table> {
    tables.get(table_id).ok_or_else(|| ScrapeError::NotFound {
        table_id: table_id.to_string(),
    })
}

/// Matchweek plus every unwanted record. Any failing record fails the report.
pub fn build_report(tables: &Tables) -> Result<Report> {
    let matchweek = matchweek(table(tables, STANDARD_TABLE)?)?;
    let records = UNWANTED_RECORDS
        .iter()
        .map(|query| {
            Ok(RecordLine {
                label: query.label.to_string(),
                result: query.evaluate(table(tables, query.table_id)?)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Report { matchweek, records })
}

/// Scrape with whatever source the config names, then build the report.
///
/// A browser session is always shut down before any scraping error is
/// surfaced.
pub async fn run(config: &Config) -> Result<Report> {
    let tables = match &config.source {
        PageSource::Directory(dir) => {
            scrape_tables(&DirectoryFetcher::new(dir), &config.competition, PAGES).await?
        }
        PageSource::Http => {
            scrape_tables(&HttpFetcher::new()?, &config.competition, PAGES).await?
        }
        PageSource::WebDriver { driver_path, port } => {
            let browser = WebDriverFetcher::launch(driver_path, *port).await?;
            let scraped = scrape_tables(&browser, &config.competition, PAGES).await;
            if let Err(e) = browser.quit().await {
                warn!(error = %e, "browser did not shut down cleanly");
            }
            scraped?
        }
    };
    build_report(&tables)
}
