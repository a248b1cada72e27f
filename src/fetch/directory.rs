// src/fetch/directory.rs

use super::{category_of, PageFetcher};
use crate::error::{Result, ScrapeError};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};
use url::Url;

/// Serves pages saved earlier, one `<category>.html` per stats page
/// (`stats.html`, `shooting.html`, ...).
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    dir: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, url: &Url) -> Result<PathBuf> {
        let category =
            category_of(url).ok_or_else(|| ScrapeError::fetch(url.as_str(), "no stats category in url"))?;
        Ok(self.dir.join(format!("{category}.html")))
    }
}

impl PageFetcher for DirectoryFetcher {
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<String> {
        let path = self.path_for(url)?;
        let html = fs::read_to_string(&path)
            .await
            .map_err(|e| ScrapeError::fetch(url.as_str(), format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), bytes = html.len(), "read saved page");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_page_by_category() {
        let tmp = tempdir().unwrap();
        std::fs::write(tmp.path().join("shooting.html"), "<html>shots</html>").unwrap();

        let fetcher = DirectoryFetcher::new(tmp.path());
        let url = Url::parse("https://fbref.com/en/comps/9/shooting/Premier-League-Stats").unwrap();
        assert_eq!(fetcher.fetch(&url).await.unwrap(), "<html>shots</html>");
    }

    #[tokio::test]
    async fn missing_file_is_a_fetch_error() {
        let tmp = tempdir().unwrap();
        let fetcher = DirectoryFetcher::new(tmp.path());
        let url = Url::parse("https://fbref.com/en/comps/9/misc/Premier-League-Stats").unwrap();
        assert!(matches!(
            fetcher.fetch(&url).await,
            Err(ScrapeError::Fetch { .. })
        ));
    }
}
