//! Name and price derivation for a single container.
//!
//! Both fields are derived by a cascade: an ordered slice of strategies, each
//! a plain function of the container, tried until one yields a value.

use super::document::Container;
use super::rules::CompiledRules;
use regex_lite::Regex;
use scraper::Selector;
use std::ops::RangeInclusive;

/// Text lengths accepted from a descendant element as a name.
pub const ELEMENT_NAME_LEN: RangeInclusive<usize> = 10..=150;

/// Text lengths accepted from the whole container as a name.
pub const CONTAINER_NAME_LEN: RangeInclusive<usize> = 10..=200;

/// A single rule in a cascade.
pub type Strategy = fn(&FieldExtractor, &Container) -> Option<String>;

/// Name strategies, highest priority first.
pub const NAME_STRATEGIES: &[Strategy] = &[
    FieldExtractor::name_from_selectors,
    FieldExtractor::name_from_text_elements,
    FieldExtractor::name_from_container_text,
];

/// Price strategies, highest priority first.
pub const PRICE_STRATEGIES: &[Strategy] = &[
    FieldExtractor::price_from_selectors,
    FieldExtractor::price_from_symbol_pattern,
    FieldExtractor::price_from_bare_number,
];

/// Raw fields pulled out of one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub name: Option<String>,
    pub price_text: Option<String>,
}

/// Derives product name and price text from a container.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    names: Vec<(String, Selector)>,
    text_elements: Selector,
    prices: Vec<(String, Selector)>,
    currency_symbol: String,
    price_like: Regex,
    symbol_price: Regex,
    bare_number: Regex,
}

impl FieldExtractor {
    /// Creates an extractor from compiled rules.
    pub fn new(rules: &CompiledRules) -> Self {
        Self {
            names: rules.names.clone(),
            text_elements: rules.text_elements.clone(),
            prices: rules.prices.clone(),
            currency_symbol: rules.currency_symbol.clone(),
            price_like: rules.price_like.clone(),
            symbol_price: rules.symbol_price.clone(),
            bare_number: rules.bare_number.clone(),
        }
    }

    /// Extracts both fields. Pure; never fails.
    pub fn extract(&self, container: &Container) -> RawFields {
        RawFields { name: self.name(container), price_text: self.price_text(container) }
    }

    /// Runs the name cascade.
    pub fn name(&self, container: &Container) -> Option<String> {
        run_cascade(self, NAME_STRATEGIES, container)
    }

    /// Runs the price cascade.
    pub fn price_text(&self, container: &Container) -> Option<String> {
        run_cascade(self, PRICE_STRATEGIES, container)
    }

    /// First name selector hit, preferring a non-blank `title` attribute over text.
    pub fn name_from_selectors(&self, container: &Container) -> Option<String> {
        self.names.iter().find_map(|(_, selector)| {
            let node = container.first(selector)?;
            node.non_empty_attr("title").or_else(|| non_empty(node.text()))
        })
    }

    /// First text-bearing descendant with a name-sized text that does not read as a price.
    pub fn name_from_text_elements(&self, container: &Container) -> Option<String> {
        container.all(&self.text_elements).map(|node| node.text()).find(|text| {
            ELEMENT_NAME_LEN.contains(&text.chars().count()) && !self.price_like.is_match(text)
        })
    }

    /// The container's own text, if it is name-sized.
    pub fn name_from_container_text(&self, container: &Container) -> Option<String> {
        let text = container.text();
        CONTAINER_NAME_LEN.contains(&text.chars().count()).then_some(text)
    }

    /// First price selector hit with non-blank text.
    pub fn price_from_selectors(&self, container: &Container) -> Option<String> {
        self.prices
            .iter()
            .find_map(|(_, selector)| container.first(selector).and_then(|n| non_empty(n.text())))
    }

    /// Symbol-prefixed amount anywhere in the container text.
    pub fn price_from_symbol_pattern(&self, container: &Container) -> Option<String> {
        self.symbol_price.find(&container.raw_text()).map(|m| m.as_str().to_string())
    }

    /// Any decimal number, stamped with the currency symbol.
    pub fn price_from_bare_number(&self, container: &Container) -> Option<String> {
        self.bare_number
            .find(&container.raw_text())
            .map(|m| format!("{} {}", self.currency_symbol, m.as_str()))
    }
}

fn run_cascade(
    extractor: &FieldExtractor,
    strategies: &[Strategy],
    container: &Container,
) -> Option<String> {
    strategies.iter().find_map(|strategy| strategy(extractor, container))
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}
