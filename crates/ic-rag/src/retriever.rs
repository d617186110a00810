//! Keyword retrieval over the course catalog
//!
//! Search terms are derived from the question (course-code mentions plus
//! every word longer than two characters) and a chunk is selected when any
//! term occurs in its case-folded text.

use ic_core::{Catalog, CatalogChunk};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Words must be longer than this many characters to become search terms
const MIN_WORD_CHARS: usize = 2;

fn course_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[a-z]{2,4}\s*\d{3}").expect("course code pattern"))
}

// ============================================================================
// Search Terms
// ============================================================================

/// Case-folded search terms derived from one question
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerms {
    terms: Vec<String>,
}

impl SearchTerms {
    /// Derive search terms from a raw question
    pub fn from_query(query: &str) -> Self {
        let folded = query.to_lowercase();
        let mut terms = Self::default();

        for m in course_code_pattern().find_iter(&folded) {
            let code = m.as_str();
            terms.push(code);

            let subject: String = code.chars().take_while(char::is_ascii_lowercase).collect();
            let number: String = code[subject.len()..]
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            terms.push(&format!("{subject}{number}"));
            terms.push(&format!("{subject} {number}"));
        }

        for word in folded.split_whitespace() {
            if word.chars().count() > MIN_WORD_CHARS {
                terms.push(word);
            }
        }

        terms
    }

    fn push(&mut self, term: &str) {
        if !self.terms.iter().any(|t| t == term) {
            self.terms.push(term.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Whether any term occurs in already case-folded text
    pub fn matches(&self, folded_text: &str) -> bool {
        self.terms.iter().any(|t| folded_text.contains(t.as_str()))
    }
}

// ============================================================================
// Retrieved Context
// ============================================================================

/// Deduplicated catalog chunks selected for one question
#[derive(Debug, Clone)]
pub struct RetrievedContext<'a> {
    chunks: Vec<&'a CatalogChunk>,
    text: String,
}

impl<'a> RetrievedContext<'a> {
    fn new(chunks: Vec<&'a CatalogChunk>, separator: &str) -> Self {
        let text = chunks
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(separator);
        Self { chunks, text }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[&'a CatalogChunk] {
        &self.chunks
    }

    /// Joined context text, empty when nothing matched
    pub fn text(&self) -> &str {
        &self.text
    }
}

// ============================================================================
// Retriever
// ============================================================================

/// Substring retriever over a read-only catalog
#[derive(Debug, Clone)]
pub struct KeywordRetriever {
    catalog: Catalog,
    folded: Vec<String>,
    separator: String,
}

impl KeywordRetriever {
    pub fn new(catalog: Catalog, separator: impl Into<String>) -> Self {
        let folded = catalog.iter().map(|c| c.as_str().to_lowercase()).collect();
        Self {
            catalog,
            folded,
            separator: separator.into(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Select every chunk containing any search term, first-seen order
    pub fn retrieve(&self, query: &str) -> RetrievedContext<'_> {
        self.retrieve_terms(&SearchTerms::from_query(query))
    }

    pub fn retrieve_terms(&self, terms: &SearchTerms) -> RetrievedContext<'_> {
        if terms.is_empty() {
            return RetrievedContext::new(Vec::new(), &self.separator);
        }

        let mut seen = HashSet::new();
        let chunks: Vec<_> = self
            .catalog
            .iter()
            .zip(&self.folded)
            .filter(|(_, folded)| terms.matches(folded))
            .map(|(chunk, _)| chunk)
            .filter(|chunk| seen.insert(chunk.as_str()))
            .collect();

        tracing::debug!(
            terms = terms.len(),
            matched = chunks.len(),
            "Keyword retrieval completed"
        );

        RetrievedContext::new(chunks, &self.separator)
    }
}
