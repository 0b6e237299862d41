//! Shared tokenizer and normalizer
//!
//! Single source of the tokenization rule used across the cascade: the
//! lexical index, the relevance scorer and query parsing all call
//! [`tokenize`]. Any change here applies everywhere simultaneously.
//!
//! The rule is deterministic and pure: lowercase, split on word
//! boundaries, drop tokens of length two or less, drop English stop
//! words.

use std::collections::HashSet;
use std::sync::OnceLock;

/// Fixed English stop-word list applied after length filtering
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "can", "this", "that", "these", "those", "i", "you", "he",
    "she", "it", "we", "they", "me", "him", "her", "us", "them",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Tokenize text into the ordered sequence of accepted terms.
///
/// Word characters are alphanumerics and underscore; every other
/// character is a boundary. Tokens of length two or less and stop words
/// are dropped.
///
/// # Example
///
/// ```rust
/// use cascade_search::tokenizer::tokenize;
///
/// let tokens = tokenize("The Neural Networks!");
/// assert_eq!(tokens, vec!["neural", "networks"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.len() > 2)
        .filter(|token| !stop_words().contains(token))
        .map(String::from)
        .collect()
}

/// Tokenize a document's searchable text: title followed by content.
///
/// Title tokens precede content tokens; positional information is not
/// retained beyond that ordering.
pub fn tokenize_document(title: &str, content: &str) -> Vec<String> {
    let mut tokens = tokenize(title);
    tokens.extend(tokenize(content));
    tokens
}
