//! shop-crawler - Resilient product extraction from storefront listing pages
//!
//! Finds product containers with layered selectors, extracts names and prices
//! through fallback cascades, normalizes prices and keeps only products from
//! one domain (fragrances by default).

pub mod client;
pub mod commands;
pub mod config;
pub mod export;
pub mod extract;
pub mod filters;
pub mod format;
pub mod rates;
pub mod sample;

pub use config::Config;
pub use extract::{ExtractError, ExtractionPipeline, ExtractionRules, Price, ProductRecord, ProductSet};
