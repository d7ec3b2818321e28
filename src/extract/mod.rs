//! Resilient product extraction from loosely structured search pages.

pub mod document;
pub mod error;
pub mod fields;
pub mod locator;
pub mod models;
pub mod pipeline;
pub mod price;
pub mod rules;

pub use document::{Container, Document, Node};
pub use error::{ExtractError, Field};
pub use fields::{FieldExtractor, RawFields};
pub use locator::ContainerLocator;
pub use models::{Price, ProductRecord, ProductSet, SkipCounts};
pub use pipeline::ExtractionPipeline;
pub use price::PriceNormalizer;
pub use rules::{CompiledRules, ExtractionRules};
