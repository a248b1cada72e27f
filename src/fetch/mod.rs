// src/fetch/mod.rs

pub mod directory;
pub mod http;
pub mod webdriver;

pub use directory::DirectoryFetcher;
pub use http::HttpFetcher;
pub use webdriver::WebDriverFetcher;

use crate::error::Result;
use std::future::Future;
use url::Url;

/// Turns a URL into the page's HTML, rendered if the fetcher can render.
pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String>> + Send;
}

/// Stats category of an fbref page URL: the segment before the slug, e.g.
/// `shooting` for `/en/comps/9/shooting/Premier-League-Stats`.
pub fn category_of(url: &Url) -> Option<&str> {
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [.., category, _slug] => Some(*category),
        _ => None,
    }
}
