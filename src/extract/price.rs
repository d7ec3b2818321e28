//! Price text normalization.

use super::error::ExtractError;
use super::models::Price;
use super::rules::MAX_AMOUNT;

/// Turns free-form price text into a validated `Price`.
#[derive(Debug, Clone)]
pub struct PriceNormalizer {
    symbol: String,
    max_amount: f64,
}

impl PriceNormalizer {
    /// Creates a normalizer that stamps prices with `symbol`.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into(), max_amount: MAX_AMOUNT }
    }

    /// Overrides the largest accepted amount.
    pub fn with_max_amount(mut self, max_amount: f64) -> Self {
        self.max_amount = max_amount;
        self
    }

    /// Parses and validates a price string.
    ///
    /// Anything other than digits, `.` and `,` is dropped. When both separators
    /// are present commas are taken as thousands separators; a lone comma is a
    /// decimal separator. A string like `1.234,56` therefore comes out wrong.
    pub fn normalize(&self, text: &str) -> Result<Price, ExtractError> {
        let cleaned = clean_number(text);
        if cleaned.is_empty() {
            return Err(ExtractError::invalid_price(text, "no digits"));
        }

        let amount: f64 = cleaned
            .parse()
            .map_err(|_| ExtractError::invalid_price(text, format!("unparsable '{}'", cleaned)))?;

        if !amount.is_finite() || amount <= 0.0 {
            return Err(ExtractError::invalid_price(text, "amount must be positive"));
        }

        if amount > self.max_amount {
            return Err(ExtractError::invalid_price(
                text,
                format!("amount exceeds {:.2}", self.max_amount),
            ));
        }

        let price = Price::new(self.symbol.clone(), amount);
        if price.amount() <= 0.0 {
            return Err(ExtractError::invalid_price(text, "amount rounds to zero"));
        }

        Ok(price)
    }
}

/// Keeps digits and separators, unifying the decimal separator to `.`.
fn clean_number(text: &str) -> String {
    let kept: String =
        text.chars().filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',').collect();

    if kept.contains('.') && kept.contains(',') {
        kept.replace(',', "")
    } else {
        kept.replace(',', ".")
    }
}
