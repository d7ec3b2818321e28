//! Product filtering system with composable filters.

pub mod domain;
pub mod price;

use crate::extract::ProductRecord;

pub use domain::DomainFilter;
pub use price::PriceFilter;

/// Trait for filtering products.
pub trait Filter: Send + Sync {
    /// Returns true if the product passes the filter.
    fn matches(&self, product: &ProductRecord) -> bool;

    /// Returns a description of this filter.
    fn description(&self) -> String;
}

/// A chain of filters that must all pass.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Creates an empty filter chain.
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// Adds a filter to the chain.
    pub fn add(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Checks if a product passes all filters.
    pub fn matches(&self, product: &ProductRecord) -> bool {
        self.filters.iter().all(|f| f.matches(product))
    }

    /// Filters a collection of products, keeping their order.
    pub fn apply(&self, products: Vec<ProductRecord>) -> Vec<ProductRecord> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }

    /// Returns true if no filters are configured.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns descriptions of all filters.
    pub fn descriptions(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.description()).collect()
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a FilterChain from configuration.
pub struct FilterChainBuilder {
    chain: FilterChain,
}

impl FilterChainBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self { chain: FilterChain::new() }
    }

    /// Adds a price range filter.
    pub fn price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        if min.is_some() || max.is_some() {
            self.chain.add(PriceFilter::new(min, max));
        }
        self
    }

    /// Adds a domain filter over product names.
    pub fn domain(mut self, keywords: Vec<String>, excluded: Vec<String>) -> Self {
        if !keywords.is_empty() || !excluded.is_empty() {
            self.chain.add(DomainFilter::new(keywords, excluded));
        }
        self
    }

    /// Builds the filter chain.
    pub fn build(self) -> FilterChain {
        self.chain
    }
}

impl Default for FilterChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PriceNormalizer;

    fn make_product(name: &str, price: f64) -> ProductRecord {
        let price = PriceNormalizer::new("R").normalize(&format!("R {:.2}", price)).unwrap();
        ProductRecord::new(name, price).unwrap()
    }

    #[test]
    fn test_filter_chain_new() {
        let chain = FilterChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn test_filter_chain_default() {
        let chain = FilterChain::default();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_filter_chain() {
        let mut chain = FilterChain::new();
        chain.add(PriceFilter::new(Some(100.0), Some(1000.0)));
        chain.add(DomainFilter::keywords(vec!["perfume".to_string()]));

        assert_eq!(chain.len(), 2);
        assert!(chain.matches(&make_product("Rose Perfume", 250.0)));
        assert!(!chain.matches(&make_product("Rose Perfume", 50.0)));
        assert!(!chain.matches(&make_product("Rose Candle", 250.0)));
    }

    #[test]
    fn test_filter_chain_empty_matches_all() {
        let chain = FilterChain::new();
        assert!(chain.matches(&make_product("Anything", 1.0)));
    }

    #[test]
    fn test_filter_chain_apply_keeps_order() {
        let mut chain = FilterChain::new();
        chain.add(PriceFilter::min(200.0));

        let products = vec![
            make_product("C Perfume", 300.0),
            make_product("A Perfume", 100.0),
            make_product("B Perfume", 250.0),
        ];

        let filtered = chain.apply(products);
        let names: Vec<_> = filtered.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["C Perfume", "B Perfume"]);
    }

    #[test]
    fn test_filter_chain_descriptions() {
        let mut chain = FilterChain::new();
        chain.add(PriceFilter::range(10.0, 50.0));
        chain.add(DomainFilter::keywords(vec!["oud".to_string()]));

        let descriptions = chain.descriptions();
        assert_eq!(descriptions.len(), 2);
        assert!(descriptions[0].contains("Price"));
        assert!(descriptions[1].contains("oud"));
    }

    #[test]
    fn test_filter_chain_builder() {
        let chain = FilterChainBuilder::new()
            .price_range(Some(10.0), None)
            .domain(Vec::new(), vec!["tester".to_string()])
            .build();
        assert_eq!(chain.len(), 2);

        assert!(chain.matches(&make_product("Oud Wood", 20.0)));
        assert!(!chain.matches(&make_product("Oud Wood Tester", 20.0)));
        assert!(!chain.matches(&make_product("Oud Wood", 5.0)));
    }

    #[test]
    fn test_filter_chain_builder_no_filters_when_disabled() {
        let chain = FilterChainBuilder::default()
            .price_range(None, None)
            .domain(Vec::new(), Vec::new())
            .build();

        assert!(chain.is_empty());
    }
}
