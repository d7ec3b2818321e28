//! Keyword-based product domain filtering.

use super::Filter;
use crate::extract::ProductRecord;

/// Decides whether a product name belongs to the target category.
///
/// A name matches when it contains any of `keywords` and none of `excluded`,
/// compared case-insensitively as plain substrings.
#[derive(Debug, Clone)]
pub struct DomainFilter {
    keywords: Vec<String>,
    excluded: Vec<String>,
}

impl DomainFilter {
    /// Creates a domain filter.
    pub fn new(keywords: Vec<String>, excluded: Vec<String>) -> Self {
        Self {
            keywords: lowercase(keywords),
            excluded: lowercase(excluded),
        }
    }

    /// Creates a filter with only domain keywords.
    pub fn keywords(keywords: Vec<String>) -> Self {
        Self::new(keywords, Vec::new())
    }

    /// Checks a possibly missing name. Missing or blank names never match.
    pub fn matches_name(&self, name: Option<&str>) -> bool {
        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            return false;
        };
        let name = name.to_lowercase();

        // An empty keyword list accepts any named product
        let in_domain = self.keywords.is_empty() || self.keywords.iter().any(|k| name.contains(k));

        in_domain && !self.excluded.iter().any(|k| name.contains(k))
    }
}

fn lowercase(words: Vec<String>) -> Vec<String> {
    words
        .into_iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

impl Filter for DomainFilter {
    fn matches(&self, product: &ProductRecord) -> bool {
        self.matches_name(Some(product.name()))
    }

    fn description(&self) -> String {
        let mut parts = Vec::new();

        if !self.keywords.is_empty() {
            parts.push(format!("Any of: {}", self.keywords.join(", ")));
        }

        if !self.excluded.is_empty() {
            parts.push(format!("None of: {}", self.excluded.join(", ")));
        }

        if parts.is_empty() {
            "Domain: any".to_string()
        } else {
            parts.join("; ")
        }
    }
}
