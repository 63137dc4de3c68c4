//! Qualification rules for complete listings

use crate::extractor::CompleteListing;
use crate::utils::DEFAULT_EXCLUDED_TERMS;

/// Disqualifying title terms, matched case-insensitively as substrings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFilter {
    terms: Vec<String>,
}

impl TermFilter {
    #[must_use]
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// First disqualifying term found in `title`, if any
    #[must_use]
    pub fn matching_term(&self, title: &str) -> Option<&str> {
        let title = title.to_lowercase();
        self.terms
            .iter()
            .find(|term| title.contains(term.as_str()))
            .map(String::as_str)
    }
}

impl Default for TermFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_TERMS)
    }
}

/// Whether a complete listing should be notified
#[must_use]
pub fn qualifies(listing: &CompleteListing, filter: &TermFilter) -> bool {
    filter.matching_term(&listing.title).is_none()
}
