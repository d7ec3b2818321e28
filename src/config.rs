//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::extract::ExtractionRules;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Storefront base URL used to build search URLs
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Search text appended to the base URL
    #[serde(default = "default_query")]
    pub query: String,

    /// Full page URL; overrides base_url + query when set
    #[serde(default)]
    pub url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Base delay before each request in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to delay (0 to this value)
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Export file path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Filter: minimum price
    #[serde(default)]
    pub min_price: Option<f64>,

    /// Filter: maximum price
    #[serde(default)]
    pub max_price: Option<f64>,

    /// Use built-in sample data when nothing could be extracted
    #[serde(default = "default_true")]
    pub sample_fallback: bool,

    /// Keep only the cheapest N products
    #[serde(default)]
    pub limit: Option<usize>,

    /// Currency code for an extra converted price column
    #[serde(default)]
    pub convert_to: Option<String>,

    /// Exchange rate API base URL
    #[serde(default = "default_exchange_api")]
    pub exchange_api: String,

    /// Rate used when the exchange API is unreachable
    #[serde(default)]
    pub fallback_rate: Option<f64>,

    /// Selector, keyword and currency rules
    #[serde(default)]
    pub rules: ExtractionRules,
}

fn default_base_url() -> String {
    "https://www.makro.co.za".to_string()
}

fn default_query() -> String {
    "Perfumes & Bakhoor".to_string()
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_delay_jitter_ms() -> u64 {
    2000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_output() -> PathBuf {
    PathBuf::from("products.csv")
}

fn default_true() -> bool {
    true
}

fn default_exchange_api() -> String {
    "https://api.exchangerate-api.com".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            query: default_query(),
            url: None,
            proxy: None,
            delay_ms: default_delay_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
            timeout_secs: default_timeout_secs(),
            format: OutputFormat::Table,
            output: default_output(),
            min_price: None,
            max_price: None,
            sample_fallback: true,
            limit: None,
            convert_to: None,
            exchange_api: default_exchange_api(),
            fallback_rate: None,
            rules: ExtractionRules::default(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("shop-crawler.toml");
        if local_config.exists() {
            debug!("Found shop-crawler.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("shop-crawler").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("SHOP_URL") {
            self.url = Some(url);
        }

        if let Ok(proxy) = std::env::var("SHOP_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(delay) = std::env::var("SHOP_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        if let Ok(output) = std::env::var("SHOP_OUTPUT") {
            self.output = PathBuf::from(output);
        }

        self
    }

    /// The page to fetch: the explicit URL, or a search URL for the query.
    pub fn target_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => search_url(&self.base_url, &self.query),
        }
    }
}

/// Builds a storefront search URL, e.g. `<base>/search/?text=Perfumes%20%26%20Bakhoor`.
pub fn search_url(base_url: &str, query: &str) -> String {
    format!("{}/search/?text={}", base_url.trim_end_matches('/'), urlencoding::encode(query.trim()))
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl OutputFormat {
    /// File extension used when exporting in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Table => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
            OutputFormat::Csv => "csv",
        }
    }

    /// Guesses a format from a file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "csv" => Some(OutputFormat::Csv),
            "json" => Some(OutputFormat::Json),
            "md" | "markdown" => Some(OutputFormat::Markdown),
            "txt" => Some(OutputFormat::Table),
            _ => None,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
