//! Price range filter.

use super::Filter;
use crate::extract::ProductRecord;

/// Filters products by price range.
pub struct PriceFilter {
    min: Option<f64>,
    max: Option<f64>,
}

impl PriceFilter {
    /// Creates a new price filter with optional min/max bounds.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Creates a filter with only minimum price.
    pub fn min(price: f64) -> Self {
        Self { min: Some(price), max: None }
    }

    /// Creates a filter with only maximum price.
    pub fn max(price: f64) -> Self {
        Self { min: None, max: Some(price) }
    }

    /// Creates a filter with both min and max.
    pub fn range(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }
}

impl Filter for PriceFilter {
    fn matches(&self, product: &ProductRecord) -> bool {
        let price = product.price().amount();

        if self.min.is_some_and(|min| price < min) {
            return false;
        }

        !self.max.is_some_and(|max| price > max)
    }

    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("Price: {:.2} - {:.2}", min, max),
            (Some(min), None) => format!("Price: >= {:.2}", min),
            (None, Some(max)) => format!("Price: <= {:.2}", max),
            (None, None) => "Price: any".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PriceNormalizer;

    fn make_product(price: &str) -> ProductRecord {
        let price = PriceNormalizer::new("R").normalize(price).unwrap();
        ProductRecord::new("Test Perfume", price).unwrap()
    }

    #[test]
    fn test_price_range() {
        let filter = PriceFilter::range(100.0, 500.0);

        assert!(!filter.matches(&make_product("R 50")));
        assert!(filter.matches(&make_product("R 100")));
        assert!(filter.matches(&make_product("R 300")));
        assert!(filter.matches(&make_product("R 500")));
        assert!(!filter.matches(&make_product("R 550")));
    }

    #[test]
    fn test_min_only() {
        let filter = PriceFilter::min(200.0);
        assert!(!filter.matches(&make_product("R 199.99")));
        assert!(filter.matches(&make_product("R 200")));
        assert!(filter.matches(&make_product("R 1999")));
    }

    #[test]
    fn test_max_only() {
        let filter = PriceFilter::max(500.0);
        assert!(filter.matches(&make_product("R 10")));
        assert!(filter.matches(&make_product("R 500")));
        assert!(!filter.matches(&make_product("R 500.01")));
    }

    #[test]
    fn test_new_no_bounds() {
        let filter = PriceFilter::new(None, None);
        assert!(filter.matches(&make_product("R 0.01")));
        assert!(filter.matches(&make_product("R 100000")));
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(PriceFilter::range(10.0, 50.0).description(), "Price: 10.00 - 50.00");
        assert_eq!(PriceFilter::min(20.0).description(), "Price: >= 20.00");
        assert_eq!(PriceFilter::max(50.0).description(), "Price: <= 50.00");
        assert_eq!(PriceFilter::new(None, None).description(), "Price: any");
    }
}
