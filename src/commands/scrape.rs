//! Scrape command implementation.

use crate::client::{FileFetcher, HttpFetcher, PageFetcher};
use crate::config::{Config, OutputFormat};
use crate::export::{sort_by_price, ExportOutcome, Exporter};
use crate::extract::{ExtractionPipeline, PriceNormalizer, ProductRecord, ProductSet, SkipCounts};
use crate::filters::FilterChainBuilder;
use crate::format::Formatter;
use crate::rates::{self, Conversion};
use crate::sample::sample_products;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Number of products shown in the console preview.
const PREVIEW_COUNT: usize = 5;

/// Printed when there is nothing to show, whatever the output format.
const NO_PRODUCTS: &str = "No products found.";

/// Shown whenever the built-in sample set replaced live results.
const SAMPLE_NOTICE: &str = "Live extraction found nothing; showing sample data.";

/// What a scrape produced and where it went.
#[derive(Debug)]
pub struct ScrapeReport {
    /// Final products, cheapest first
    pub products: Vec<ProductRecord>,
    /// Containers the locator found on the page
    pub containers_seen: usize,
    /// Containers rejected during extraction
    pub skipped: SkipCounts,
    /// True when the built-in sample set replaced an empty result
    pub used_sample: bool,
    /// Export result; `None` when there was nothing to export
    pub export: Option<ExportOutcome>,
}

impl ScrapeReport {
    /// Notice to surface alongside the products, if any.
    pub fn notice(&self) -> Option<&'static str> {
        self.used_sample.then_some(SAMPLE_NOTICE)
    }
}

/// Fetches one listing page, extracts products and exports them.
pub struct ScrapeCommand {
    config: Config,
    input: Option<PathBuf>,
}

impl ScrapeCommand {
    /// Creates a new scrape command.
    pub fn new(config: Config) -> Self {
        Self { config, input: None }
    }

    /// Reads the page from a saved HTML file instead of the network.
    pub fn with_input(mut self, input: Option<PathBuf>) -> Self {
        self.input = input;
        self
    }

    /// Executes the scrape and returns console output.
    pub async fn execute(&self) -> Result<String> {
        let http = HttpFetcher::new(&self.config).context("Failed to create HTTP client")?;
        let conversion = self.resolve_conversion(&http).await;

        let report = match &self.input {
            Some(path) => self.execute_with_fetcher(&FileFetcher::new(path), conversion.clone()).await?,
            None => self.execute_with_fetcher(&http, conversion.clone()).await?,
        };

        Ok(self.render(&report, conversion))
    }

    /// Executes the scrape with a provided fetcher (for testing).
    pub async fn execute_with_fetcher(
        &self,
        fetcher: &impl PageFetcher,
        conversion: Option<Conversion>,
    ) -> Result<ScrapeReport> {
        let pipeline = ExtractionPipeline::from_rules(&self.config.rules)
            .context("Invalid extraction rules")?;

        let url = self.config.target_url();
        let set = match fetcher.fetch(&url).await {
            Ok(html) => pipeline.run_html(&html),
            Err(e) => {
                warn!("Could not fetch {}: {:#}", url, e);
                ProductSet::new()
            }
        };

        let containers_seen = set.containers_seen;
        let skipped = set.skipped;
        let mut products = set.into_products();
        let mut used_sample = false;

        if products.is_empty() && self.config.sample_fallback {
            warn!("No products extracted, using sample data");
            let normalizer = PriceNormalizer::new(self.config.rules.currency_symbol.clone())
                .with_max_amount(self.config.rules.max_amount);
            products = sample_products(&normalizer);
            used_sample = true;
        }

        let filters = FilterChainBuilder::new()
            .price_range(self.config.min_price, self.config.max_price)
            .domain(self.config.rules.keywords.clone(), self.config.rules.exclude_keywords.clone())
            .build();

        if !filters.is_empty() {
            debug!("Active filters: {}", filters.descriptions().join(", "));
        }

        let mut products = filters.apply(products);
        sort_by_price(&mut products);

        if let Some(limit) = self.config.limit {
            products.truncate(limit);
        }

        info!("Found {} products matching criteria", products.len());

        let export = if products.is_empty() {
            None
        } else {
            Some(Exporter::new(conversion).export(&products, &self.config.output))
        };

        Ok(ScrapeReport { products, containers_seen, skipped, used_sample, export })
    }

    async fn resolve_conversion(&self, http: &HttpFetcher) -> Option<Conversion> {
        let to = self.config.convert_to.as_deref()?;
        let from = &self.config.rules.currency_code;

        if to.eq_ignore_ascii_case(from) {
            debug!("Conversion target matches listing currency, skipping");
            return None;
        }

        rates::resolve(http.client(), &self.config.exchange_api, from, to, self.config.fallback_rate)
            .await
    }

    fn render(&self, report: &ScrapeReport, conversion: Option<Conversion>) -> String {
        let formatter = Formatter::new(self.config.format).with_conversion(conversion);

        let saved = match &report.export {
            None => return NO_PRODUCTS.to_string(),
            Some(ExportOutcome::Console(table)) => return table.clone(),
            Some(ExportOutcome::Written(path)) => {
                format!("Saved {} products to {}", report.products.len(), path.display())
            }
            Some(ExportOutcome::Secondary(path)) => {
                format!("Saved {} products to fallback file {}", report.products.len(), path.display())
            }
        };

        let mut lines = Vec::new();

        match self.config.format {
            // Machine-readable output stays pure; the notice goes to the log
            OutputFormat::Json | OutputFormat::Csv => {
                if let Some(notice) = report.notice() {
                    warn!("{}", notice);
                }
                info!("{}", saved);
                return formatter.format_products(&report.products);
            }
            OutputFormat::Markdown => {
                if let Some(notice) = report.notice() {
                    lines.push(format!("> {}", notice));
                    lines.push(String::new());
                }
                lines.push(formatter.format_products(&report.products));
                info!("{}", saved);
                return lines.join("\n");
            }
            OutputFormat::Table => {}
        }

        if let Some(notice) = report.notice() {
            lines.push(notice.to_string());
        }
        lines.push(formatter.preview(&report.products, PREVIEW_COUNT));
        lines.push(String::new());
        lines.push(saved);
        lines.join("\n")
    }
}
