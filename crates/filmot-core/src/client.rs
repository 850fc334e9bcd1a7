//! HTTP client for filmot.com result pages
//!
//! One GET per page, no retries. Every transport or status error comes
//! back as an `Err` value for the orchestrator to record.

use std::future::Future;
use std::time::Duration;

use crate::error::{FilmotError, Result};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Request timeout in seconds (default: none, the client's own default)
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            timeout_secs: None,
        }
    }
}

/// Something that can retrieve the raw body of a results page
///
/// The orchestrator only depends on this seam, so tests can substitute
/// canned pages, failures and artificial delays.
pub trait PageFetcher {
    /// Fetches `url` and returns the document body
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// HTTP client wrapper used for fetching filmot.com pages
///
/// The inner `reqwest::Client` pools connections, so one instance is
/// shared by all concurrent page-tasks of a run.
#[derive(Debug, Clone)]
pub struct FilmotClient {
    client: reqwest::Client,
}

impl FilmotClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent);

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().map_err(FilmotError::HttpError)?;

        Ok(Self { client })
    }

    /// Fetch HTML content from a full URL
    ///
    /// # Errors
    /// - `HttpError` - Network errors or an unreadable body
    /// - `HttpStatus` - The server answered with a non-2xx status
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        tracing::debug!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FilmotError::HttpError)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FilmotError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(FilmotError::HttpError)
    }
}

impl PageFetcher for FilmotClient {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send {
        self.fetch_page(url)
    }
}
