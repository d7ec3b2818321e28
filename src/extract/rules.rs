//! Selector and keyword lists that drive extraction.
//!
//! These lists change whenever a storefront changes its markup. They are plain
//! configuration (loadable from the `[rules]` table of the config file) and are
//! compiled into `CompiledRules` once per pipeline.
//!
//! **Update process**: when a page yields no products, capture the HTML,
//! adjust the lists here or in the config file, and add a test fixture.

use super::error::ExtractError;
use regex_lite::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};

/// Product container selectors, in priority order. All matching selectors contribute.
pub const CONTAINER_SELECTORS: &[&str] = &[
    ".product-grid .product-item",
    ".product-list .product-item",
    ".search-results .product",
    "[data-component='product']",
    ".productList li",
    "[class*='ProductCard']",
    "[class*='product-card']",
    "[class*='product-tile']",
    "li.product",
];

/// Tags scanned when no container selector matches.
pub const FALLBACK_TAGS: &[&str] = &["div", "li", "article"];

/// Class substring that marks a fallback container.
pub const FALLBACK_CLASS_MARKER: &str = "product";

/// Name element selectors, in priority order.
pub const NAME_SELECTORS: &[&str] = &[
    ".product-name",
    ".name",
    "h3",
    "h2",
    ".title",
    "[class*='name']",
    "[class*='title']",
    "a[title]",
];

/// Elements scanned for name-like text when no name selector matches.
pub const TEXT_ELEMENTS: &str = "div, a, span, h3, h4";

/// Price element selectors, in priority order.
pub const PRICE_SELECTORS: &[&str] = &[
    ".price",
    ".product-price",
    ".current-price",
    ".amount",
    ".priceToPay",
    "[class*='price']",
    "[class*='Price']",
];

/// Keywords that identify the default product domain (fragrances).
pub const DOMAIN_KEYWORDS: &[&str] = &[
    "perfume",
    "fragrance",
    "cologne",
    "eau de",
    "spray",
    "scent",
    "bakhoor",
    "parfum",
    "toilette",
    "attar",
    "oud",
    "musk",
];

/// Upper bound for a believable price.
pub const MAX_AMOUNT: f64 = 100_000.0;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_container_selectors() -> Vec<String> {
    strings(CONTAINER_SELECTORS)
}

fn default_fallback_tags() -> Vec<String> {
    strings(FALLBACK_TAGS)
}

fn default_fallback_class_marker() -> String {
    FALLBACK_CLASS_MARKER.to_string()
}

fn default_name_selectors() -> Vec<String> {
    strings(NAME_SELECTORS)
}

fn default_text_elements() -> String {
    TEXT_ELEMENTS.to_string()
}

fn default_price_selectors() -> Vec<String> {
    strings(PRICE_SELECTORS)
}

fn default_domain_keywords() -> Vec<String> {
    strings(DOMAIN_KEYWORDS)
}

fn default_currency_symbol() -> String {
    "R".to_string()
}

fn default_currency_code() -> String {
    "ZAR".to_string()
}

fn default_max_amount() -> f64 {
    MAX_AMOUNT
}

/// Configurable extraction rules for one product domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRules {
    /// Container selectors, tried in order and accumulated
    #[serde(default = "default_container_selectors")]
    pub container_selectors: Vec<String>,

    /// Tags scanned by the class-marker fallback
    #[serde(default = "default_fallback_tags")]
    pub fallback_tags: Vec<String>,

    /// Class substring required by the fallback scan
    #[serde(default = "default_fallback_class_marker")]
    pub fallback_class_marker: String,

    /// Name selectors, first hit wins
    #[serde(default = "default_name_selectors")]
    pub name_selectors: Vec<String>,

    /// Elements scanned for name-like text
    #[serde(default = "default_text_elements")]
    pub text_elements: String,

    /// Price selectors, first hit wins
    #[serde(default = "default_price_selectors")]
    pub price_selectors: Vec<String>,

    /// Domain keywords (any must match)
    #[serde(default = "default_domain_keywords")]
    pub keywords: Vec<String>,

    /// Keywords that exclude a product from the domain
    #[serde(default)]
    pub exclude_keywords: Vec<String>,

    /// Currency symbol prices are written with
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// ISO code of that currency
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Largest accepted price
    #[serde(default = "default_max_amount")]
    pub max_amount: f64,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            container_selectors: default_container_selectors(),
            fallback_tags: default_fallback_tags(),
            fallback_class_marker: default_fallback_class_marker(),
            name_selectors: default_name_selectors(),
            text_elements: default_text_elements(),
            price_selectors: default_price_selectors(),
            keywords: default_domain_keywords(),
            exclude_keywords: Vec::new(),
            currency_symbol: default_currency_symbol(),
            currency_code: default_currency_code(),
            max_amount: default_max_amount(),
        }
    }
}

impl ExtractionRules {
    /// Compiles selectors and patterns.
    pub fn compile(&self) -> Result<CompiledRules, ExtractError> {
        let symbol = regex_lite::escape(&self.currency_symbol);

        Ok(CompiledRules {
            containers: compile_all(&self.container_selectors)?,
            fallback_tags: self.fallback_tags.clone(),
            fallback_class_marker: self.fallback_class_marker.clone(),
            names: compile_all(&self.name_selectors)?,
            text_elements: compile(&self.text_elements)?.1,
            prices: compile_all(&self.price_selectors)?,
            currency_symbol: self.currency_symbol.clone(),
            price_like: pattern(&format!(r"^(?:{}|\$)?\s*\d", symbol))?,
            symbol_price: pattern(&format!(r"{}\s*\d+(?:[.,]\d+)?", symbol))?,
            bare_number: pattern(r"\d+[.,]\d+")?,
        })
    }
}

/// Rules with every selector parsed and every pattern built.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub containers: Vec<(String, Selector)>,
    pub fallback_tags: Vec<String>,
    pub fallback_class_marker: String,
    pub names: Vec<(String, Selector)>,
    pub text_elements: Selector,
    pub prices: Vec<(String, Selector)>,
    pub currency_symbol: String,
    /// Text that starts like a price (`R 12`, `$5`, `42`)
    pub price_like: Regex,
    /// Symbol-prefixed amount (`R 799.00`, `R1,234`)
    pub symbol_price: Regex,
    /// Any decimal number (`12.50`, `12,50`)
    pub bare_number: Regex,
}

fn compile(raw: &str) -> Result<(String, Selector), ExtractError> {
    Selector::parse(raw)
        .map(|s| (raw.to_string(), s))
        .map_err(|e| ExtractError::InvalidSelector {
            selector: raw.to_string(),
            reason: e.to_string(),
        })
}

fn compile_all(raw: &[String]) -> Result<Vec<(String, Selector)>, ExtractError> {
    raw.iter().map(|s| compile(s)).collect()
}

fn pattern(raw: &str) -> Result<Regex, ExtractError> {
    Regex::new(raw).map_err(|e| ExtractError::InvalidPattern(e.to_string()))
}
