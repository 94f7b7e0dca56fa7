use crate::error::Result;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Single-shot page fetcher. One GET per call, no retries.
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch `url` and return the body text.
    ///
    /// Connection errors, timeouts and 4xx/5xx statuses are logged with the
    /// offending URL and returned as `Err`; callers decide whether to skip.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        match self.get_text(url).await {
            Ok(body) => Ok(body),
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                Err(e)
            }
        }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;
        let status = response.status();
        let body = response.text().await?;

        debug!("{} -> {} ({} bytes)", url, status, body.len());
        Ok(body)
    }
}
