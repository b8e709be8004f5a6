//! Page fetching.
//!
//! [`PageFetcher`] is the seam between the aggregator and the network; the
//! production implementation is [`HttpFetcher`], tests plug in canned pages.

use crate::config::FetchSettings;
use reqwest::Client;
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Something that can return the markup of a page.
pub trait PageFetcher {
    /// Fetch `url` and return the response body as text.
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// Fetches pages over HTTP with a fixed timeout and User-Agent.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Build a fetcher from the `fetch` settings.
    ///
    /// # Arguments
    ///
    /// * `settings` - Timeout and User-Agent applied to every request
    ///
    /// # Errors
    ///
    /// Fails if the underlying `reqwest` client cannot be built, for example
    /// when the TLS backend does not initialize.
    pub fn new(settings: &FetchSettings) -> Result<Self, Box<dyn Error>> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(settings.user_agent.as_str())
            .build()?;
        Ok(Self { client, timeout })
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_fetcher_builds_from_settings() {
        let settings = FetchSettings {
            timeout_secs: 3,
            ..FetchSettings::default()
        };
        let fetcher = HttpFetcher::new(&settings).unwrap();
        assert_eq!(fetcher.timeout, Duration::from_secs(3));
        assert!(format!("{fetcher:?}").contains("HttpFetcher"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let settings = FetchSettings {
            timeout_secs: 2,
            ..FetchSettings::default()
        };
        let fetcher = HttpFetcher::new(&settings).unwrap();
        // Port 9 on localhost is the discard service; nothing should be listening.
        assert!(fetcher.fetch("http://127.0.0.1:9/").await.is_err());
    }
}
