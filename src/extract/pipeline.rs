//! End-to-end extraction: locate, extract, normalize, filter, collect.

use super::document::{Container, Document};
use super::error::{ExtractError, Field};
use super::fields::FieldExtractor;
use super::locator::ContainerLocator;
use super::models::{ProductRecord, ProductSet};
use super::price::PriceNormalizer;
use super::rules::ExtractionRules;
use crate::filters::DomainFilter;
use tracing::{debug, trace};

/// Runs the extraction stages over one document at a time.
///
/// Holds no mutable state, so one pipeline can serve many documents and
/// separate documents can be processed on separate threads.
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    locator: ContainerLocator,
    extractor: FieldExtractor,
    normalizer: PriceNormalizer,
    domain: DomainFilter,
}

impl ExtractionPipeline {
    /// Assembles a pipeline from its stages.
    pub fn new(
        locator: ContainerLocator,
        extractor: FieldExtractor,
        normalizer: PriceNormalizer,
        domain: DomainFilter,
    ) -> Self {
        Self { locator, extractor, normalizer, domain }
    }

    /// Builds every stage from one rule set.
    pub fn from_rules(rules: &ExtractionRules) -> Result<Self, ExtractError> {
        let compiled = rules.compile()?;

        Ok(Self::new(
            ContainerLocator::new(&compiled),
            FieldExtractor::new(&compiled),
            PriceNormalizer::new(rules.currency_symbol.clone()).with_max_amount(rules.max_amount),
            DomainFilter::new(rules.keywords.clone(), rules.exclude_keywords.clone()),
        ))
    }

    /// Parses markup and runs the pipeline on it.
    pub fn run_html(&self, html: &str) -> ProductSet {
        self.run(&Document::parse(html))
    }

    /// Extracts every acceptable product from `document`, in container order.
    ///
    /// Rejected containers are counted and skipped; the run never aborts.
    pub fn run(&self, document: &Document) -> ProductSet {
        let containers = self.locator.locate(document);
        let mut set = ProductSet::new();
        set.containers_seen = containers.len();

        for container in &containers {
            match self.process(container) {
                Ok(record) => {
                    trace!("Accepted product: {} - {}", record.name(), record.price());
                    set.products.push(record);
                }
                Err(e) => {
                    trace!("Skipping container: {}", e);
                    if !set.skipped.record(&e) {
                        debug!("Uncounted extraction error: {}", e);
                    }
                }
            }
        }

        debug!(
            "Extracted {} products from {} containers ({} skipped)",
            set.count(),
            set.containers_seen,
            set.skipped.total()
        );

        set
    }

    /// Turns one container into a record or the reason it was rejected.
    pub fn process(&self, container: &Container) -> Result<ProductRecord, ExtractError> {
        let fields = self.extractor.extract(container);

        let name = fields.name.ok_or(ExtractError::FieldMissing { field: Field::Name })?;
        let price_text =
            fields.price_text.ok_or(ExtractError::FieldMissing { field: Field::Price })?;

        let price = self.normalizer.normalize(&price_text)?;

        if !self.domain.matches_name(Some(&name)) {
            return Err(ExtractError::OutOfDomain { name });
        }

        ProductRecord::new(name, price).ok_or(ExtractError::FieldMissing { field: Field::Name })
    }
}
