//! Data models for extracted products and prices.

use super::error::ExtractError;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// A validated price: currency symbol plus an amount rounded to cents.
#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    symbol: String,
    amount: f64,
}

impl Price {
    /// Builds a price, rounding the amount to two decimals.
    ///
    /// Range validation lives in `PriceNormalizer`; this only canonicalizes.
    pub(crate) fn new(symbol: impl Into<String>, amount: f64) -> Self {
        Self { symbol: symbol.into(), amount: (amount * 100.0).round() / 100.0 }
    }

    /// Currency symbol, e.g. `R`.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Amount rounded to two decimals.
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.symbol, self.amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Price", 3)?;
        state.serialize_field("symbol", &self.symbol)?;
        state.serialize_field("amount", &self.amount)?;
        state.serialize_field("display", &self.to_string())?;
        state.end()
    }
}

/// A product that passed name, price and domain checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    name: String,
    price: Price,
}

impl ProductRecord {
    /// Creates a record. Returns `None` for a blank name.
    pub fn new(name: impl Into<String>, price: Price) -> Option<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return None;
        }
        Some(Self { name, price })
    }

    /// Product name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validated price.
    pub fn price(&self) -> &Price {
        &self.price
    }
}

/// Why containers were skipped during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub missing_field: usize,
    pub invalid_price: usize,
    pub out_of_domain: usize,
}

impl SkipCounts {
    /// Total skipped containers.
    pub fn total(&self) -> usize {
        self.missing_field + self.invalid_price + self.out_of_domain
    }

    /// Counts a container rejection. Returns false for errors that are not
    /// per-container rejections, which are left uncounted.
    pub fn record(&mut self, error: &ExtractError) -> bool {
        match error {
            ExtractError::FieldMissing { .. } => self.missing_field += 1,
            ExtractError::InvalidPrice { .. } => self.invalid_price += 1,
            ExtractError::OutOfDomain { .. } => self.out_of_domain += 1,
            ExtractError::NoContainersFound
            | ExtractError::InvalidSelector { .. }
            | ExtractError::InvalidPattern(_) => return false,
        }
        true
    }
}

/// Ordered products from one pipeline run. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductSet {
    /// Accepted products, in container order
    pub products: Vec<ProductRecord>,
    /// Containers the locator produced
    pub containers_seen: usize,
    /// Skip reasons
    pub skipped: SkipCounts,
}

impl ProductSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns number of products.
    pub fn count(&self) -> usize {
        self.products.len()
    }

    /// Returns true if no products were accepted.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Consumes the set, yielding its products.
    pub fn into_products(self) -> Vec<ProductRecord> {
        self.products
    }
}
