//! Layer 2: probabilistic relevance scorer
//!
//! Maintains its own copy of the corpus with per-document accepted-token
//! counts, a document-frequency table and the running average document
//! length. Scores Stage-1 candidates with Okapi BM25 by default, or
//! classic TF-IDF as an alternative, and materializes ranked results with
//! a per-term score breakdown for diagnostics.
//!
//! # BM25
//!
//! ```text
//! score(D, Q) = Σ idf(t) * (tf(t, D) * (k1 + 1)) / (tf(t, D) + k1 * (1 - b + b * |D| / avgdl))
//! idf(t)      = ln(1 + (N - df(t) + 0.5) / (df(t) + 0.5))
//! ```
//!
//! The idf uses the Lucene-style `ln(1 + …)` form so partial scores stay
//! non-negative on small corpora where `df(t)` approaches `N`.

use crate::domain::types::{CorpusStats, Document, RankingMethod, SearchResult};
use crate::tokenizer::tokenize_document;
use itertools::Itertools;
use std::collections::HashMap;

/// Maximum characters retained in a result excerpt
const EXCERPT_CHARS: usize = 200;

/// BM25 tuning parameters
#[derive(Debug, Clone, Copy)]
pub struct Bm25Params {
    /// Term-frequency saturation (default 1.2)
    pub k1: f64,
    /// Document-length normalization strength (default 0.75)
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

/// A corpus entry with its cached token statistics.
///
/// Token counts are computed once at add time; the numbers are identical
/// to re-tokenizing the stored document on every query.
#[derive(Debug)]
struct CorpusDocument {
    document: Document,
    length: usize,
    term_counts: HashMap<String, usize>,
}

/// BM25 / TF-IDF scorer over the Stage-1 candidate set
pub struct RelevanceScorer {
    documents: HashMap<String, CorpusDocument>,
    document_frequency: HashMap<String, usize>,
    total_length: usize,
    avg_document_length: f64,
    params: Bm25Params,
    method: RankingMethod,
    max_results: usize,
}

impl RelevanceScorer {
    /// Create an empty scorer emitting at most `max_results` ranked results
    pub fn new(max_results: usize) -> Self {
        Self::with_params(max_results, Bm25Params::default(), RankingMethod::default())
    }

    /// Create a scorer with explicit BM25 parameters and ranking method
    pub fn with_params(max_results: usize, params: Bm25Params, method: RankingMethod) -> Self {
        Self {
            documents: HashMap::new(),
            document_frequency: HashMap::new(),
            total_length: 0,
            avg_document_length: 0.0,
            params,
            method,
            max_results,
        }
    }

    /// Add a document to the corpus, replacing any previous version
    pub fn add_document(&mut self, document: Document) {
        if self.documents.contains_key(&document.id) {
            let id = document.id.clone();
            self.remove_document(&id);
        }

        let tokens = tokenize_document(&document.title, &document.content);
        let mut term_counts: HashMap<String, usize> = HashMap::new();
        for token in &tokens {
            *term_counts.entry(token.clone()).or_insert(0) += 1;
        }

        for term in term_counts.keys() {
            *self.document_frequency.entry(term.clone()).or_insert(0) += 1;
        }

        self.total_length += tokens.len();
        self.documents.insert(
            document.id.clone(),
            CorpusDocument {
                document,
                length: tokens.len(),
                term_counts,
            },
        );
        self.recompute_average();
    }

    /// Remove a document; returns false when the id is unknown
    pub fn remove_document(&mut self, id: &str) -> bool {
        let Some(entry) = self.documents.remove(id) else {
            return false;
        };

        for term in entry.term_counts.keys() {
            if let Some(df) = self.document_frequency.get_mut(term) {
                *df -= 1;
                if *df == 0 {
                    self.document_frequency.remove(term);
                }
            }
        }

        self.total_length -= entry.length;
        self.recompute_average();
        true
    }

    fn recompute_average(&mut self) {
        self.avg_document_length = if self.documents.is_empty() {
            0.0
        } else {
            self.total_length as f64 / self.documents.len() as f64
        };
    }

    /// Score the candidate ids against the query tokens.
    ///
    /// Candidates with zero total score are omitted; the rest are sorted
    /// by score descending and truncated to the configured cap. Each
    /// result carries the per-term score breakdown and the document
    /// length in its metadata.
    pub fn score(&self, query_tokens: &[String], candidates: &[String]) -> Vec<SearchResult> {
        if query_tokens.is_empty() || self.documents.is_empty() {
            return Vec::new();
        }

        // repeated query terms contribute once, keeping the breakdown
        // consistent with the total
        let unique_terms: Vec<&str> = query_tokens.iter().map(String::as_str).unique().collect();

        let mut scored: Vec<(f64, SearchResult)> = Vec::new();
        for id in candidates {
            let Some(entry) = self.documents.get(id) else {
                continue;
            };

            let mut breakdown: HashMap<&str, f64> = HashMap::new();
            let mut total = 0.0;
            for &term in &unique_terms {
                let partial = match self.method {
                    RankingMethod::Bm25 => self.bm25_partial(term, entry),
                    RankingMethod::TfIdf => self.tfidf_partial(term, entry),
                };
                if partial != 0.0 {
                    breakdown.insert(term, partial);
                    total += partial;
                }
            }

            if total == 0.0 {
                continue;
            }

            scored.push((total, self.materialize(entry, total, &breakdown)));
        }

        scored
            .into_iter()
            .sorted_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal))
            .take(self.max_results)
            .map(|(_, result)| result)
            .collect()
    }

    fn bm25_partial(&self, term: &str, entry: &CorpusDocument) -> f64 {
        let tf = entry.term_counts.get(term).copied().unwrap_or(0) as f64;
        let df = self.document_frequency.get(term).copied().unwrap_or(0) as f64;
        if tf == 0.0 || df == 0.0 {
            return 0.0;
        }

        let n = self.documents.len() as f64;
        let idf = (1.0 + (n - df + 0.5) / (df + 0.5)).ln();
        let Bm25Params { k1, b } = self.params;
        let length_norm = 1.0 - b + b * entry.length as f64 / self.avg_document_length;
        idf * (tf * (k1 + 1.0)) / (tf + k1 * length_norm)
    }

    fn tfidf_partial(&self, term: &str, entry: &CorpusDocument) -> f64 {
        let tf = entry.term_counts.get(term).copied().unwrap_or(0) as f64;
        let df = self.document_frequency.get(term).copied().unwrap_or(0) as f64;
        if tf == 0.0 || df == 0.0 || entry.length == 0 {
            return 0.0;
        }

        let n = self.documents.len() as f64;
        (tf / entry.length as f64) * (n / df).ln()
    }

    fn materialize(
        &self,
        entry: &CorpusDocument,
        score: f64,
        breakdown: &HashMap<&str, f64>,
    ) -> SearchResult {
        let document = &entry.document;
        let mut metadata = match &document.metadata {
            serde_json::Value::Object(map) => map.clone(),
            _ => serde_json::Map::new(),
        };
        if let Some(category) = &document.category {
            metadata.insert("category".into(), serde_json::json!(category));
        }
        if !document.tags.is_empty() {
            metadata.insert("tags".into(), serde_json::json!(document.tags));
        }
        if let Some(created_at) = &document.created_at {
            metadata.insert("created_at".into(), serde_json::json!(created_at));
        }
        metadata.insert("document_length".into(), serde_json::json!(entry.length));
        metadata.insert("score_breakdown".into(), serde_json::json!(breakdown));

        SearchResult {
            id: document.id.clone(),
            title: document.title.clone(),
            content: excerpt(&document.content),
            url: document.url.clone(),
            score,
            metadata: serde_json::Value::Object(metadata),
        }
    }

    /// Materialize a candidate without scoring (Stage-1-only operations)
    pub fn materialize_unscored(&self, id: &str) -> Option<SearchResult> {
        self.documents.get(id).map(|entry| {
            let document = &entry.document;
            let mut metadata = match &document.metadata {
                serde_json::Value::Object(map) => map.clone(),
                _ => serde_json::Map::new(),
            };
            if let Some(category) = &document.category {
                metadata.insert("category".into(), serde_json::json!(category));
            }
            metadata.insert("document_length".into(), serde_json::json!(entry.length));

            SearchResult {
                id: document.id.clone(),
                title: document.title.clone(),
                content: excerpt(&document.content),
                url: document.url.clone(),
                score: 0.0,
                metadata: serde_json::Value::Object(metadata),
            }
        })
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when the corpus is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Current average document length in accepted tokens
    pub fn avg_document_length(&self) -> f64 {
        self.avg_document_length
    }

    /// Document frequency of a term
    pub fn document_frequency(&self, term: &str) -> usize {
        self.document_frequency.get(term).copied().unwrap_or(0)
    }

    /// Corpus statistics
    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            documents: self.documents.len(),
            avg_document_length: self.avg_document_length,
            unique_terms: self.document_frequency.len(),
        }
    }
}

/// Truncate content to the excerpt budget, appending an ellipsis when cut
fn excerpt(content: &str) -> String {
    if content.chars().count() <= EXCERPT_CHARS {
        return content.to_string();
    }
    let mut truncated: String = content.chars().take(EXCERPT_CHARS).collect();
    truncated.push('…');
    truncated
}
