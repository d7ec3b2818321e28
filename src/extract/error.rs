//! Error taxonomy for the extraction core.

use std::fmt;
use thiserror::Error;

/// Field of a product listing the extractor derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Price,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Price => write!(f, "price"),
        }
    }
}

/// Failures raised while locating or extracting products.
///
/// Per-container variants (`FieldMissing`, `InvalidPrice`, `OutOfDomain`) are
/// recovered by the pipeline and only counted. The selector/pattern variants
/// come from building rules and are returned to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    #[error("No product containers found in document")]
    NoContainersFound,

    #[error("Could not derive product {field}")]
    FieldMissing { field: Field },

    #[error("Invalid price '{text}': {reason}")]
    InvalidPrice { text: String, reason: String },

    #[error("'{name}' does not match the target product domain")]
    OutOfDomain { name: String },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

impl ExtractError {
    pub(crate) fn invalid_price(text: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPrice { text: text.to_string(), reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ExtractError::FieldMissing { field: Field::Price };
        assert_eq!(err.to_string(), "Could not derive product price");

        let err = ExtractError::invalid_price("R 0.00", "amount must be positive");
        assert_eq!(err.to_string(), "Invalid price 'R 0.00': amount must be positive");

        let err = ExtractError::InvalidSelector {
            selector: "[[".to_string(),
            reason: "unexpected token".to_string(),
        };
        assert!(err.to_string().contains("[["));
    }
}
