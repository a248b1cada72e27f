// src/fetch/webdriver.rs
//
// Minimal W3C WebDriver client: enough to open one headless Chrome session,
// navigate, and read back the rendered page source.

use super::PageFetcher;
use crate::error::{Result, ScrapeError};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use std::{path::Path, process::Stdio, time::Duration};
use tokio::{
    process::{Child, Command},
    runtime::Handle,
    time::sleep,
};
use tracing::{debug, info, instrument, warn};
use url::Url;

const READY_POLL_ATTEMPTS: u32 = 50;
const READY_POLL_DELAY: Duration = Duration::from_millis(100);

#[derive(Deserialize)]
struct Envelope<T> {
    value: T,
}

#[derive(Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct Status {
    ready: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewSession {
    session_id: String,
}

/// Issue one WebDriver command and unwrap the `value` envelope.
async fn command<T: DeserializeOwned>(
    client: &Client,
    url: Url,
    method: Method,
    body: Option<serde_json::Value>,
) -> std::result::Result<T, String> {
    let mut req = client.request(method, url.clone());
    if let Some(body) = body {
        req = req.json(&body);
    }
    let resp = req.send().await.map_err(|e| e.to_string())?;
    let status = resp.status();
    let bytes = resp.bytes().await.map_err(|e| e.to_string())?;

    if !status.is_success() {
        return Err(match serde_json::from_slice::<Envelope<WireError>>(&bytes) {
            Ok(Envelope { value }) => format!("{status} {}: {}", value.error, value.message),
            Err(_) => format!("{status} from {url}"),
        });
    }
    serde_json::from_slice::<Envelope<T>>(&bytes)
        .map(|e| e.value)
        .map_err(|e| format!("decoding response from {url}: {e}"))
}

fn endpoint(base: &Url, path: &str) -> Result<Url> {
    base.join(path)
        .map_err(|e| ScrapeError::fetch(base.as_str(), format!("bad endpoint {path}: {e}")))
}

/// A chromedriver process plus one headless Chrome session on it.
///
/// Call [`WebDriverFetcher::quit`] when done; it closes the Chrome session
/// and then stops the driver. Dropping the fetcher without `quit` (early
/// return, panic) schedules the same shutdown on the current tokio runtime.
/// With no runtime left to run it, only the driver process is killed, and
/// the Chrome it started may outlive it.
#[derive(Debug)]
pub struct WebDriverFetcher {
    client: Client,
    base: Url,
    session_id: String,
    /// `None` once shutdown has started.
    driver: Option<Child>,
}

impl WebDriverFetcher {
    #[instrument(level = "info", skip(driver_path), fields(driver = %driver_path.display()))]
    pub async fn launch(driver_path: &Path, port: u16) -> Result<Self> {
        let driver = Command::new(driver_path)
            .arg(format!("--port={port}"))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScrapeError::fetch(driver_path.display().to_string(), e))?;

        let base = Url::parse(&format!("http://127.0.0.1:{port}/"))
            .map_err(|e| ScrapeError::Config(format!("webdriver port {port}: {e}")))?;
        let client = Client::new();

        wait_until_ready(&client, &base).await?;

        let caps = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": ["--headless"] }
                }
            }
        });
        let session: NewSession = command(&client, endpoint(&base, "session")?, Method::POST, Some(caps))
            .await
            .map_err(|e| ScrapeError::fetch(base.as_str(), format!("new session: {e}")))?;

        info!(session = %session.session_id, "browser session started");
        Ok(Self {
            client,
            base,
            session_id: session.session_id,
            driver: Some(driver),
        })
    }

    fn session_url(&self, suffix: &str) -> Result<Url> {
        endpoint(&self.base, &format!("session/{}/{suffix}", self.session_id))
    }

    fn delete_url(&self) -> Result<Url> {
        endpoint(&self.base, &format!("session/{}", self.session_id))
    }

    /// End the browser session and stop the driver.
    pub async fn quit(mut self) -> Result<()> {
        let driver = self.driver.take();
        let url = self.delete_url()?;
        let closed = command::<serde_json::Value>(&self.client, url, Method::DELETE, None).await;
        if let Some(driver) = driver {
            stop_driver(driver).await;
        }
        info!("browser session closed");
        closed
            .map(|_| ())
            .map_err(|e| ScrapeError::fetch(self.base.as_str(), format!("delete session: {e}")))
    }
}

async fn stop_driver(mut driver: Child) {
    if let Err(e) = driver.kill().await {
        warn!(error = %e, "stopping chromedriver failed");
    }
}

impl Drop for WebDriverFetcher {
    fn drop(&mut self) {
        let Some(driver) = self.driver.take() else {
            return;
        };
        // without a runtime the child drops here and kill_on_drop stops it
        let (Ok(runtime), Ok(url)) = (Handle::try_current(), self.delete_url()) else {
            return;
        };
        warn!(session = %self.session_id, "browser dropped without quit, closing session");
        let client = self.client.clone();
        runtime.spawn(async move {
            if let Err(e) = command::<serde_json::Value>(&client, url, Method::DELETE, None).await {
                warn!(error = %e, "closing abandoned session failed");
            }
            stop_driver(driver).await;
        });
    }
}

async fn wait_until_ready(client: &Client, base: &Url) -> Result<()> {
    let status_url = endpoint(base, "status")?;
    for attempt in 1..=READY_POLL_ATTEMPTS {
        match command::<Status>(client, status_url.clone(), Method::GET, None).await {
            Ok(Status { ready: true }) => {
                debug!(attempt, "chromedriver ready");
                return Ok(());
            }
            Ok(_) | Err(_) => sleep(READY_POLL_DELAY).await,
        }
    }
    Err(ScrapeError::fetch(
        base.as_str(),
        format!("chromedriver not ready after {READY_POLL_ATTEMPTS} attempts"),
    ))
}

impl PageFetcher for WebDriverFetcher {
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<String> {
        command::<serde_json::Value>(
            &self.client,
            self.session_url("url")?,
            Method::POST,
            Some(json!({ "url": url.as_str() })),
        )
        .await
        .map_err(|e| ScrapeError::fetch(url.as_str(), format!("navigate: {e}")))?;

        let html: String = command(&self.client, self.session_url("source")?, Method::GET, None)
            .await
            .map_err(|e| ScrapeError::fetch(url.as_str(), format!("page source: {e}")))?;
        debug!(bytes = html.len(), "rendered page");
        Ok(html)
    }
}
