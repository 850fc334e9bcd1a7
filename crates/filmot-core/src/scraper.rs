//! Main scraper API for filmot.com
//!
//! Fans one fetch-then-extract task per results page out over a bounded
//! pool and folds the per-page id lists back together in page order.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use tracing::Instrument;

use crate::client::{ClientConfig, FilmotClient, PageFetcher};
use crate::error::{FilmotError, Result};
use crate::parser::parse_search_results;
use crate::types::{PageReport, PageStatus, SearchResults, VideoId};
use crate::url::{SEARCH_BASE_URL, build_search_url_with_base};

/// Configuration for a scraping run
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Search endpoint page URLs are built against (default: filmot.com)
    pub search_base: String,
    /// Maximum number of pages fetched at the same time (default: 8)
    pub concurrency: usize,
    /// Drop repeated ids, keeping the first occurrence (default: false)
    pub unique: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            search_base: SEARCH_BASE_URL.to_string(),
            concurrency: 8,
            unique: false,
        }
    }
}

/// Ids and terminal state of one finished page-task
struct PageOutcome {
    page: u32,
    url: String,
    ids: Vec<VideoId>,
    status: PageStatus,
}

impl PageOutcome {
    fn extracted(page: u32, url: String, ids: Vec<VideoId>) -> Self {
        let status = PageStatus::Extracted(ids.len());
        Self {
            page,
            url,
            ids,
            status,
        }
    }

    fn failed(page: u32, url: String, error: &FilmotError) -> Self {
        Self {
            page,
            url,
            ids: Vec::new(),
            status: PageStatus::Failed(error.to_string()),
        }
    }
}

/// Main scraper API for filmot.com
///
/// Combines a page fetcher with the search results parser. Failures of
/// individual pages are logged and recorded in the page reports; they
/// never abort the other pages of the run.
pub struct FilmotScraper<F = FilmotClient> {
    fetcher: F,
    config: ScraperConfig,
}

impl FilmotScraper<FilmotClient> {
    /// Create a new scraper with default configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default(), ScraperConfig::default())
    }

    /// Create a new scraper with custom client and run configuration
    ///
    /// # Errors
    /// - `HttpError` if HTTP client initialization fails
    /// - `InvalidConfig` if the concurrency cap is zero
    pub fn with_config(client_config: ClientConfig, config: ScraperConfig) -> Result<Self> {
        let client = FilmotClient::with_config(client_config)?;
        Self::with_fetcher(client, config)
    }
}

impl<F: PageFetcher> FilmotScraper<F> {
    /// Create a scraper on top of any page fetcher
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the concurrency cap is zero
    pub fn with_fetcher(fetcher: F, config: ScraperConfig) -> Result<Self> {
        if config.concurrency == 0 {
            return Err(FilmotError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }

        Ok(Self { fetcher, config })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Request URLs of pages `1..=page_count`, in page order
    pub fn page_urls(&self, query: &str, page_count: u32) -> Vec<String> {
        (1..=page_count)
            .map(|page| build_search_url_with_base(&self.config.search_base, query, page))
            .collect()
    }

    /// Collect video ids from the first `page_count` result pages
    ///
    /// Waits for every page-task to settle. The returned ids are page 1's
    /// list, then page 2's, and so on, whatever order the fetches finish in.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `page_count` is zero. Fetch and parse
    /// failures are not errors; see [`SearchResults::pages`].
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> filmot_core::Result<()> {
    /// use filmot_core::FilmotScraper;
    /// let scraper = FilmotScraper::new()?;
    /// let results = scraper.search("never gonna give you up", 3).await?;
    /// for id in &results.video_ids {
    ///     println!("{}", id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, query: &str, page_count: u32) -> Result<SearchResults> {
        if page_count == 0 {
            return Err(FilmotError::InvalidConfig(
                "page count must be at least 1".to_string(),
            ));
        }

        let urls = self.page_urls(query, page_count);
        let in_flight = self.config.concurrency.min(urls.len());

        tracing::debug!(
            "Scraping {} page(s) with up to {} concurrent request(s)",
            page_count,
            in_flight
        );

        let mut outcomes: Vec<PageOutcome> = stream::iter((1..=page_count).zip(urls))
            .map(|(page, url)| {
                self.run_page(page, url)
                    .instrument(tracing::debug_span!("page", page))
            })
            .buffer_unordered(in_flight)
            .collect()
            .await;

        outcomes.sort_by_key(|outcome| outcome.page);

        Ok(self.aggregate(outcomes))
    }

    /// Fetch one page and extract its ids; never fails
    async fn run_page(&self, page: u32, url: String) -> PageOutcome {
        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to fetch page {} ({}): {}", page, url, e);
                return PageOutcome::failed(page, url, &e);
            }
        };

        tracing::debug!("Parsing video ids ({})", url);

        match parse_search_results(&body) {
            Ok(ids) => {
                tracing::debug!("Page {} yielded {} id(s)", page, ids.len());
                PageOutcome::extracted(page, url, ids)
            }
            Err(e) => {
                tracing::warn!("Failed to parse page {} ({}): {}", page, url, e);
                PageOutcome::failed(page, url, &e)
            }
        }
    }

    /// Concatenate page-ordered outcomes into the run result
    fn aggregate(&self, outcomes: Vec<PageOutcome>) -> SearchResults {
        let mut results = SearchResults::default();
        let mut seen = HashSet::new();

        for outcome in outcomes {
            for id in outcome.ids {
                if !self.config.unique || seen.insert(id.clone()) {
                    results.video_ids.push(id);
                }
            }

            results.pages.push(PageReport {
                page: outcome.page,
                url: outcome.url,
                status: outcome.status,
            });
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tracing_subscriber::fmt::MakeWriter;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BASE: &str = "https://filmot.test/search";

    fn thumbnails(ids: &[&str]) -> String {
        let imgs: String = ids
            .iter()
            .map(|id| format!(r#"<img src="https://img.youtube.com/vi/{}/0.jpg">"#, id))
            .collect();
        format!("<html><body>{}</body></html>", imgs)
    }

    fn test_config(concurrency: usize) -> ScraperConfig {
        ScraperConfig {
            search_base: BASE.to_string(),
            concurrency,
            unique: false,
        }
    }

    /// Serves canned pages keyed by page number, optionally delayed
    #[derive(Default)]
    struct FakeFetcher {
        pages: HashMap<u32, Option<String>>,
        delays_ms: HashMap<u32, u64>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeFetcher {
        fn page(mut self, page: u32, ids: &[&str]) -> Self {
            self.pages.insert(page, Some(thumbnails(ids)));
            self
        }

        fn failing(mut self, page: u32) -> Self {
            self.pages.insert(page, None);
            self
        }

        fn delay(mut self, page: u32, ms: u64) -> Self {
            self.delays_ms.insert(page, ms);
            self
        }

        fn page_number(url: &str) -> u32 {
            url.trim_end_matches('?')
                .rsplit('/')
                .next()
                .and_then(|p| p.parse().ok())
                .unwrap_or(0)
        }
    }

    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            let page = Self::page_number(url);

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(ms) = self.delays_ms.get(&page) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.pages.get(&page) {
                Some(Some(body)) => Ok(body.clone()),
                _ => Err(FilmotError::HttpStatus {
                    status: 503,
                    url: url.to_string(),
                }),
            }
        }
    }

    fn id_strings(results: &SearchResults) -> Vec<&str> {
        results.video_ids.iter().map(VideoId::as_str).collect()
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_scraper_creation() {
        let scraper = FilmotScraper::new();
        assert!(scraper.is_ok());
    }

    #[test]
    fn test_scraper_config_default() {
        let config = ScraperConfig::default();
        assert_eq!(config.search_base, "https://filmot.com/search");
        assert_eq!(config.concurrency, 8);
        assert!(!config.unique);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let result = FilmotScraper::with_fetcher(FakeFetcher::default(), test_config(0));
        match result {
            Err(FilmotError::InvalidConfig(msg)) => assert!(msg.contains("concurrency")),
            _ => panic!("Expected InvalidConfig error"),
        }
    }

    #[test]
    fn test_page_urls_one_per_page() {
        let scraper = FilmotScraper::with_fetcher(FakeFetcher::default(), test_config(2)).unwrap();
        let urls = scraper.page_urls("test video", 3);
        assert_eq!(
            urls,
            vec![
                "https://filmot.test/search/test+video/1/1?",
                "https://filmot.test/search/test+video/1/2?",
                "https://filmot.test/search/test+video/1/3?",
            ]
        );
    }

    #[tokio::test]
    async fn test_zero_pages_rejected() {
        let scraper = FilmotScraper::with_fetcher(FakeFetcher::default(), test_config(2)).unwrap();
        let result = scraper.search("anything", 0).await;
        assert!(matches!(result, Err(FilmotError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_failed_page_contributes_nothing() {
        let fetcher = FakeFetcher::default()
            .page(1, &["x"])
            .failing(2)
            .page(3, &["y"]);
        let scraper = FilmotScraper::with_fetcher(fetcher, test_config(3)).unwrap();

        let results = scraper.search("q", 3).await.unwrap();

        assert_eq!(id_strings(&results), vec!["x", "y"]);
        assert_eq!(results.pages.len(), 3);
        assert_eq!(results.pages[0].status, PageStatus::Extracted(1));
        assert!(results.pages[1].is_failed());
        assert_eq!(results.pages[1].page, 2);
        assert_eq!(results.pages[2].status, PageStatus::Extracted(1));
        assert_eq!(results.failed_pages(), 1);
    }

    #[tokio::test]
    async fn test_order_independent_of_completion_order() {
        let pages: [(u32, &[&str]); 4] = [
            (1, &["a1", "a2"]),
            (2, &["b1"]),
            (3, &[]),
            (4, &["d1", "d2", "d3"]),
        ];

        let mut forward = FakeFetcher::default();
        let mut reverse = FakeFetcher::default();
        for (page, ids) in pages {
            forward = forward.page(page, ids).delay(page, u64::from(page) * 15);
            reverse = reverse.page(page, ids).delay(page, u64::from(5 - page) * 15);
        }

        let forward = FilmotScraper::with_fetcher(forward, test_config(4)).unwrap();
        let reverse = FilmotScraper::with_fetcher(reverse, test_config(4)).unwrap();

        let forward_results = forward.search("q", 4).await.unwrap();
        let reverse_results = reverse.search("q", 4).await.unwrap();

        assert_eq!(
            id_strings(&forward_results),
            vec!["a1", "a2", "b1", "d1", "d2", "d3"]
        );
        assert_eq!(forward_results, reverse_results);
    }

    #[tokio::test]
    async fn test_concurrency_cap_bounds_in_flight_requests() {
        let mut fetcher = FakeFetcher::default();
        for page in 1..=6 {
            fetcher = fetcher.page(page, &["id"]).delay(page, 20);
        }
        let scraper = FilmotScraper::with_fetcher(fetcher, test_config(2)).unwrap();

        let results = scraper.search("q", 6).await.unwrap();

        assert_eq!(results.len(), 6);
        let max = scraper.fetcher.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 2, "saw {} requests in flight", max);
        assert!(max >= 1);
    }

    #[tokio::test]
    async fn test_duplicates_kept_by_default() {
        let fetcher = FakeFetcher::default()
            .page(1, &["a", "b", "a"])
            .page(2, &["b", "c"]);
        let scraper = FilmotScraper::with_fetcher(fetcher, test_config(2)).unwrap();

        let results = scraper.search("q", 2).await.unwrap();

        assert_eq!(id_strings(&results), vec!["a", "b", "a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_unique_keeps_first_occurrence() {
        let fetcher = FakeFetcher::default()
            .page(1, &["a", "b", "a"])
            .page(2, &["b", "c"]);
        let config = ScraperConfig {
            unique: true,
            ..test_config(2)
        };
        let scraper = FilmotScraper::with_fetcher(fetcher, config).unwrap();

        let results = scraper.search("q", 2).await.unwrap();

        assert_eq!(id_strings(&results), vec!["a", "b", "c"]);
        // Reports still describe what each page extracted
        assert_eq!(results.pages[0].status, PageStatus::Extracted(3));
        assert_eq!(results.pages[1].status, PageStatus::Extracted(2));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_logged() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let fetcher = FakeFetcher::default().page(1, &["x"]).failing(2);
        let scraper = FilmotScraper::with_fetcher(fetcher, test_config(2)).unwrap();
        let results = scraper.search("q", 2).await.unwrap();

        assert_eq!(id_strings(&results), vec!["x"]);

        let output = logs.contents();
        assert!(output.contains("WARN"));
        assert!(output.contains("Failed to fetch page 2"));
        assert!(output.contains("https://filmot.test/search/q/1/2?"));
    }

    #[tokio::test]
    async fn test_search_end_to_end_over_http() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/rick+astley/1/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(thumbnails(&["dQw4w9WgXcQ", "yPYZpwSpKmA"])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/search/rick+astley/1/2"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/search/rick+astley/1/3"))
            .respond_with(ResponseTemplate::new(200).set_body_string(thumbnails(&["AC3Ejf7vPEY"])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = ScraperConfig {
            search_base: format!("{}/search", mock_server.uri()),
            ..ScraperConfig::default()
        };
        let scraper = FilmotScraper::with_config(ClientConfig::default(), config).unwrap();

        let results = scraper.search("rick  astley", 3).await.unwrap();

        assert_eq!(
            id_strings(&results),
            vec!["dQw4w9WgXcQ", "yPYZpwSpKmA", "AC3Ejf7vPEY"]
        );
        assert_eq!(
            results.pages[1].status,
            PageStatus::Failed(format!(
                "HTTP 404 for {}/search/rick+astley/1/2?",
                mock_server.uri()
            ))
        );
    }
}
