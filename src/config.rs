// src/config.rs

use crate::error::{Result, ScrapeError};
use crate::pages::Competition;
use crate::report::ReportFormat;
use std::path::PathBuf;

pub const DEFAULT_WEBDRIVER_PORT: u16 = 9515;

/// Where rendered pages come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    /// Drive headless Chrome through a local chromedriver.
    WebDriver { driver_path: PathBuf, port: u16 },
    /// Plain HTTP GET, no rendering.
    Http,
    /// Read `<category>.html` files saved earlier.
    Directory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: PageSource,
    pub competition: Competition,
    pub format: ReportFormat,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// `CHROME_DRIVER_PATH` is mandatory unless `FBREF_HTML_DIR` is set or
    /// `FBREF_FETCH=http` asks for plain HTTP.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let source = match get("FBREF_HTML_DIR") {
            Some(dir) => PageSource::Directory(PathBuf::from(dir)),
            None if get("FBREF_FETCH").is_some_and(|f| f.trim().eq_ignore_ascii_case("http")) => {
                PageSource::Http
            }
            None => {
                let driver_path = get("CHROME_DRIVER_PATH").map(PathBuf::from).ok_or_else(|| {
                    ScrapeError::Config("CHROME_DRIVER_PATH is not set".to_string())
                })?;
                let port = match get("WEBDRIVER_PORT") {
                    Some(p) => p.trim().parse::<u16>().map_err(|e| {
                        ScrapeError::Config(format!("WEBDRIVER_PORT `{p}`: {e}"))
                    })?,
                    None => DEFAULT_WEBDRIVER_PORT,
                };
                PageSource::WebDriver { driver_path, port }
            }
        };

        let mut competition = Competition::default();
        if let Some(id) = get("FBREF_COMP_ID") {
            competition.id = id
                .trim()
                .parse::<u32>()
                .map_err(|e| ScrapeError::Config(format!("FBREF_COMP_ID `{id}`: {e}")))?;
        }
        if let Some(slug) = get("FBREF_COMP_SLUG") {
            competition.slug = slug.trim().to_string();
        }

        let format = match get("REPORT_FORMAT") {
            Some(f) => f.parse::<ReportFormat>().map_err(ScrapeError::Config)?,
            None => ReportFormat::default(),
        };

        Ok(Config {
            source,
            competition,
            format,
        })
    }
}
