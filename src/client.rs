//! Page fetching: HTTP via wreq for TLS fingerprint emulation, or local files.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::RngExt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Trait for fetching raw page markup - enables mocking for tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the markup behind `url`.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP fetcher with browser impersonation and polite delays.
pub struct HttpFetcher {
    client: Client,
    referer: String,
    delay_ms: u64,
    delay_jitter_ms: u64,
}

impl HttpFetcher {
    /// Creates a fetcher from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            referer: format!("{}/", config.base_url.trim_end_matches('/')),
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
        })
    }

    /// Adds a random delay to mimic human behavior.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }

    /// Underlying client, shared with the exchange rate lookup.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.delay().await;

        info!("Fetching: {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Referer", self.referer.as_str())
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 403 || status == 503 {
            warn!("Request blocked ({}). Consider using a proxy or increasing delay.", status);
            anyhow::bail!("Blocked by the storefront ({}). Try increasing --delay or using a proxy.", status);
        }

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }
}

/// Reads markup from a saved page on disk; the URL argument is ignored.
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    /// Creates a fetcher for a saved HTML file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PageFetcher for FileFetcher {
    async fn fetch(&self, _url: &str) -> Result<String> {
        info!("Reading page from: {}", self.path.display());
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read HTML file: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config(base_url: &str) -> Config {
        Config {
            base_url: base_url.to_string(),
            delay_ms: 0,        // No delay for tests
            delay_jitter_ms: 0, // No jitter for tests
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;

        let html = r#"<html><body><li class="product"><h3>Oud Perfume</h3></li></body></html>"#;

        Mock::given(method("GET"))
            .and(path("/search/"))
            .and(query_param("text", "oud perfume"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&mock_server)
            .await;

        let config = make_test_config(&mock_server.uri());
        let fetcher = HttpFetcher::new(&config).unwrap();
        let url = crate::config::search_url(&mock_server.uri(), "oud perfume");

        let body = fetcher.fetch(&url).await.unwrap();
        assert!(body.contains("Oud Perfume"));
    }

    #[tokio::test]
    async fn test_fetch_sends_referer() {
        let mock_server = MockServer::start().await;
        let referer = format!("{}/", mock_server.uri());

        Mock::given(method("GET"))
            .and(header("Referer", referer.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(&make_test_config(&mock_server.uri())).unwrap();
        let body = fetcher.fetch(&format!("{}/page", mock_server.uri())).await.unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_blocked_503() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(&make_test_config(&mock_server.uri())).unwrap();
        let err = fetcher.fetch(&mock_server.uri()).await.unwrap_err().to_string();
        assert!(err.contains("Blocked"));
    }

    #[tokio::test]
    async fn test_http_error_404() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(&make_test_config(&mock_server.uri())).unwrap();
        let err = fetcher.fetch(&mock_server.uri()).await.unwrap_err().to_string();
        assert!(err.contains("404"));
    }

    #[tokio::test]
    async fn test_new_takes_settings_from_config() {
        let config = Config {
            base_url: "http://localhost/".to_string(),
            delay_ms: 1000,
            delay_jitter_ms: 500,
            ..Config::default()
        };

        let fetcher = HttpFetcher::new(&config).unwrap();
        assert_eq!(fetcher.delay_ms, 1000);
        assert_eq!(fetcher.delay_jitter_ms, 500);
        assert_eq!(fetcher.referer, "http://localhost/");
    }

    #[tokio::test]
    async fn test_file_fetcher() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "<html>saved page</html>").unwrap();

        let fetcher = FileFetcher::new(file.path());
        let body = fetcher.fetch("ignored").await.unwrap();
        assert_eq!(body, "<html>saved page</html>");
    }

    #[tokio::test]
    async fn test_file_fetcher_missing_file() {
        let fetcher = FileFetcher::new("/nonexistent/page.html");
        let err = fetcher.fetch("ignored").await.unwrap_err().to_string();
        assert!(err.contains("Failed to read HTML file"));
    }
}
