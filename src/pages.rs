// src/pages.rs

use crate::error::{Result, ScrapeError};
use url::Url;

const FBREF_BASE: &str = "https://fbref.com/en/comps/";

/// One fbref stats page and the table it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub category: &'static str,
    pub table_id: &'static str,
}

pub static PAGES: &[Page] = &[
    Page { category: "stats", table_id: "stats_standard" },
    Page { category: "shooting", table_id: "stats_shooting" },
    Page { category: "passing", table_id: "stats_passing" },
    Page { category: "defense", table_id: "stats_defense" },
    Page { category: "playingtime", table_id: "stats_playing_time" },
    Page { category: "misc", table_id: "stats_misc" },
];

/// Which competition to scrape, e.g. `9` / `Premier-League`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Competition {
    pub id: u32,
    pub slug: String,
}

impl Default for Competition {
    fn default() -> Self {
        Self {
            id: 9,
            slug: "Premier-League".to_string(),
        }
    }
}

impl Competition {
    pub fn page_url(&self, page: &Page) -> Result<Url> {
        let path = format!("{}/{}/{}-Stats", self.id, page.category, self.slug);
        Url::parse(FBREF_BASE)
            .and_then(|base| base.join(&path))
            .map_err(|e| ScrapeError::Config(format!("bad page url for {}: {e}", page.table_id)))
    }
}
