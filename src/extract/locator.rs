//! Product container discovery.

use super::document::{Container, Document};
use super::error::ExtractError;
use super::rules::CompiledRules;
use scraper::Selector;
use tracing::{debug, trace};

/// Finds the subtrees of a document that look like product listings.
#[derive(Debug, Clone)]
pub struct ContainerLocator {
    selectors: Vec<(String, Selector)>,
    fallback_tags: Vec<String>,
    fallback_class_marker: String,
}

impl ContainerLocator {
    /// Creates a locator from compiled rules.
    pub fn new(rules: &CompiledRules) -> Self {
        Self {
            selectors: rules.containers.clone(),
            fallback_tags: rules.fallback_tags.clone(),
            fallback_class_marker: rules.fallback_class_marker.clone(),
        }
    }

    /// Returns candidate containers in emission order.
    ///
    /// Every selector that matches contributes all of its matches, so a node
    /// matched by two selectors appears twice. Only when no selector matches
    /// does the class-marker scan run. An empty result is not an error.
    pub fn locate<'a>(&self, document: &'a Document) -> Vec<Container<'a>> {
        let mut containers = Vec::new();

        for (raw, selector) in &self.selectors {
            let found = document.select(selector);
            if !found.is_empty() {
                debug!("Found {} containers with selector: {}", found.len(), raw);
                containers.extend(found);
            }
        }

        if containers.is_empty() {
            debug!("No containers matched known selectors, scanning class names");
            containers = self.scan_by_class(document);
        }

        if containers.is_empty() {
            debug!("{}", ExtractError::NoContainersFound);
        }

        containers
    }

    /// Elements of the fallback tags whose class mentions the marker.
    fn scan_by_class<'a>(&self, document: &'a Document) -> Vec<Container<'a>> {
        document
            .elements_by_tag(&self.fallback_tags)
            .into_iter()
            .filter(|c| c.node().has_class_containing(&self.fallback_class_marker))
            .inspect(|c| trace!("Fallback container <{}>", c.node().tag()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::rules::ExtractionRules;

    fn locator() -> ContainerLocator {
        ContainerLocator::new(&ExtractionRules::default().compile().unwrap())
    }

    #[test]
    fn test_single_selector() {
        let doc = Document::parse(
            r#"<ul class="productList"><li>One</li><li>Two</li></ul><p>noise</p>"#,
        );
        let found = locator().locate(&doc);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].text(), "One");
        assert_eq!(found[1].text(), "Two");
    }

    #[test]
    fn test_selectors_accumulate_with_duplicates() {
        // `li.product` and `.search-results .product` both match the same items.
        let doc = Document::parse(
            r#"<div class="search-results">
                 <ul><li class="product">A</li><li class="product">B</li></ul>
               </div>
               <div class="product-card">C</div>"#,
        );
        let found = locator().locate(&doc);
        let texts: Vec<_> = found.iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["A", "B", "C", "A", "B"]);
    }

    #[test]
    fn test_class_fallback() {
        let doc = Document::parse(
            r#"<div class="ItemProductBox">Fallback one</div>
               <section class="product">ignored tag</section>
               <article class="PRODUCTS-entry">Fallback two</article>
               <div class="banner">not a product</div>"#,
        );
        let found = locator().locate(&doc);
        let texts: Vec<_> = found.iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["Fallback one", "Fallback two"]);
    }

    #[test]
    fn test_fallback_skipped_when_selectors_match() {
        let doc = Document::parse(
            r#"<li class="product">Listed</li><div class="productish">unrelated</div>"#,
        );
        let found = locator().locate(&doc);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text(), "Listed");
    }

    #[test]
    fn test_nothing_found() {
        let doc = Document::parse("<html><body><p>Nothing to see</p></body></html>");
        assert!(locator().locate(&doc).is_empty());
    }
}
