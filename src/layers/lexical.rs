//! Layer 1: lexical candidate filter
//!
//! Maintains an inverted mapping from term to posting list (document id
//! set, per-document term frequency, document frequency). Supports fast
//! candidate retrieval as the union of posting lists plus AND/OR/NOT
//! boolean retrieval over the same structure.
//!
//! Posting lists are kept in `BTreeSet`s so unions and truncation are
//! deterministic (ascending document id) across runs.

use crate::domain::types::{BooleanOperator, Document, LexicalStats};
use crate::tokenizer::tokenize_document;
use std::collections::{BTreeSet, HashMap};

/// One inverted-index entry for a term.
///
/// Invariant: `document_frequency() == document_ids.len() ==
/// term_frequency.len()`, maintained by every mutation path.
#[derive(Debug, Default)]
struct TermEntry {
    /// Ids of documents containing the term
    document_ids: BTreeSet<String>,
    /// Term occurrences per document id
    term_frequency: HashMap<String, usize>,
}

impl TermEntry {
    fn document_frequency(&self) -> usize {
        self.document_ids.len()
    }
}

/// Inverted index over the document corpus
pub struct InvertedIndex {
    index: HashMap<String, TermEntry>,
    documents: HashMap<String, Document>,
    total_tokens: u64,
    max_candidates: usize,
}

impl InvertedIndex {
    /// Create an empty index capping candidate retrieval at `max_candidates`
    pub fn new(max_candidates: usize) -> Self {
        Self {
            index: HashMap::new(),
            documents: HashMap::new(),
            total_tokens: 0,
            max_candidates,
        }
    }

    /// Index a document's title and content.
    ///
    /// Re-adding an id replaces the previous version.
    pub fn add_document(&mut self, document: Document) {
        if self.documents.contains_key(&document.id) {
            let id = document.id.clone();
            self.remove_document(&id);
        }

        let tokens = tokenize_document(&document.title, &document.content);
        for token in &tokens {
            let entry = self.index.entry(token.clone()).or_default();
            entry.document_ids.insert(document.id.clone());
            *entry.term_frequency.entry(document.id.clone()).or_insert(0) += 1;
        }

        self.total_tokens += tokens.len() as u64;
        self.documents.insert(document.id.clone(), document);
    }

    /// Remove a document, dropping empty term entries.
    ///
    /// Returns false when the id is unknown.
    pub fn remove_document(&mut self, id: &str) -> bool {
        let Some(document) = self.documents.remove(id) else {
            return false;
        };

        let tokens = tokenize_document(&document.title, &document.content);
        for token in &tokens {
            if let Some(entry) = self.index.get_mut(token) {
                entry.document_ids.remove(id);
                entry.term_frequency.remove(id);
                if entry.document_ids.is_empty() {
                    self.index.remove(token);
                }
            }
        }

        self.total_tokens = self.total_tokens.saturating_sub(tokens.len() as u64);
        true
    }

    /// Candidate retrieval: union of posting lists for all query tokens,
    /// truncated to the configured cap in ascending id order.
    ///
    /// An empty token list yields an empty result.
    pub fn candidates(&self, query: &str) -> Vec<String> {
        let tokens = crate::tokenizer::tokenize(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut ids = BTreeSet::new();
        for token in &tokens {
            if let Some(entry) = self.index.get(token) {
                ids.extend(entry.document_ids.iter().cloned());
            }
        }

        ids.into_iter().take(self.max_candidates).collect()
    }

    /// Boolean retrieval over the query tokens
    pub fn boolean_search(&self, query: &str, operator: BooleanOperator) -> Vec<String> {
        let tokens = crate::tokenizer::tokenize(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        match operator {
            BooleanOperator::Or => self.union(&tokens).into_iter().collect(),
            BooleanOperator::And => self.intersection(&tokens).into_iter().collect(),
            BooleanOperator::Not => {
                let matched = self.union(&tokens);
                self.all_ids().difference(&matched).cloned().collect()
            }
        }
    }

    fn union(&self, tokens: &[String]) -> BTreeSet<String> {
        let mut ids = BTreeSet::new();
        for token in tokens {
            if let Some(entry) = self.index.get(token) {
                ids.extend(entry.document_ids.iter().cloned());
            }
        }
        ids
    }

    fn intersection(&self, tokens: &[String]) -> BTreeSet<String> {
        let mut result: Option<BTreeSet<String>> = None;
        for token in tokens {
            let Some(entry) = self.index.get(token) else {
                return BTreeSet::new();
            };
            result = Some(match result {
                None => entry.document_ids.clone(),
                Some(acc) => acc
                    .intersection(&entry.document_ids)
                    .cloned()
                    .collect(),
            });
            if result.as_ref().is_some_and(BTreeSet::is_empty) {
                return BTreeSet::new();
            }
        }
        result.unwrap_or_default()
    }

    fn all_ids(&self) -> BTreeSet<String> {
        self.documents.keys().cloned().collect()
    }

    /// Term frequency of `term` in document `id`, zero when absent
    pub fn term_frequency(&self, term: &str, id: &str) -> usize {
        self.index
            .get(term)
            .and_then(|entry| entry.term_frequency.get(id))
            .copied()
            .unwrap_or(0)
    }

    /// Document frequency of a term
    pub fn document_frequency(&self, term: &str) -> usize {
        self.index
            .get(term)
            .map(TermEntry::document_frequency)
            .unwrap_or(0)
    }

    /// True when the id is indexed
    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when no documents are indexed
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Index-wide statistics
    pub fn stats(&self) -> LexicalStats {
        let documents = self.documents.len();
        LexicalStats {
            documents,
            unique_terms: self.index.len(),
            total_tokens: self.total_tokens,
            avg_tokens_per_document: if documents == 0 {
                0.0
            } else {
                self.total_tokens as f64 / documents as f64
            },
        }
    }

    /// Verify the per-term invariants; used by debug assertions and tests
    pub fn check_invariants(&self) -> bool {
        self.index.values().all(|entry| {
            entry.document_ids.len() == entry.term_frequency.len()
                && entry
                    .document_ids
                    .iter()
                    .all(|id| self.documents.contains_key(id))
        })
    }
}
