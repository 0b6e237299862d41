//! Property-based tests using proptest for the tokenizer and index laws
//!
//! These tests verify that the core invariants hold across a wide range
//! of inputs, not just specific test cases.

use cascade_search::domain::types::{BooleanOperator, Document};
use cascade_search::layers::InvertedIndex;
use cascade_search::tokenizer::{tokenize, STOP_WORDS};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn word() -> impl Strategy<Value = String> {
    "[a-z]{3,8}"
}

fn text(max_words: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..max_words).prop_map(|words| words.join(" "))
}

fn document() -> impl Strategy<Value = (String, String, String)> {
    ("[a-z0-9]{1,6}", text(6), text(12))
}

fn build_doc(id: &str, title: &str, content: &str) -> Document {
    Document {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        url: None,
        category: None,
        tags: Vec::new(),
        created_at: None,
        updated_at: None,
        metadata: serde_json::json!({}),
    }
}

// Property: tokenization is deterministic and independent of process state
proptest! {
    #[test]
    fn tokenize_is_deterministic(input in "\\PC*") {
        prop_assert_eq!(tokenize(&input), tokenize(&input));
    }
}

// Property: no accepted token is short or a stop word
proptest! {
    #[test]
    fn tokenize_filters_short_and_stop_tokens(input in "\\PC*") {
        for token in tokenize(&input) {
            prop_assert!(token.len() > 2, "short token survived: {:?}", token);
            prop_assert!(!STOP_WORDS.contains(&token.as_str()), "stop word survived: {:?}", token);
        }
    }
}

// Property: adding then removing a document restores index statistics
proptest! {
    #[test]
    fn add_remove_round_trips_statistics(
        base in prop::collection::vec(document(), 1..5),
        extra in document(),
    ) {
        let mut index = InvertedIndex::new(10_000);
        for (i, (id, title, content)) in base.iter().enumerate() {
            // suffix ids so generated duplicates cannot collide
            index.add_document(build_doc(&format!("{}-{}", id, i), title, content));
        }

        let before = index.stats();
        let (id, title, content) = &extra;
        let extra_id = format!("{}-extra", id);
        index.add_document(build_doc(&extra_id, title, content));
        prop_assert!(index.remove_document(&extra_id));

        let after = index.stats();
        prop_assert_eq!(before.documents, after.documents);
        prop_assert_eq!(before.unique_terms, after.unique_terms);
        prop_assert_eq!(before.total_tokens, after.total_tokens);
        prop_assert!(index.check_invariants());
    }
}

// Property: AND results are a subset of OR results, and they coincide
// for single-token queries
proptest! {
    #[test]
    fn boolean_laws_hold(
        docs in prop::collection::vec(document(), 1..6),
        query in text(3),
    ) {
        let mut index = InvertedIndex::new(10_000);
        for (i, (id, title, content)) in docs.iter().enumerate() {
            index.add_document(build_doc(&format!("{}-{}", id, i), title, content));
        }

        let and: BTreeSet<String> = index
            .boolean_search(&query, BooleanOperator::And)
            .into_iter()
            .collect();
        let or: BTreeSet<String> = index
            .boolean_search(&query, BooleanOperator::Or)
            .into_iter()
            .collect();
        prop_assert!(and.is_subset(&or));

        if let Some(single) = tokenize(&query).first() {
            let and_single = index.boolean_search(single, BooleanOperator::And);
            let or_single = index.boolean_search(single, BooleanOperator::Or);
            prop_assert_eq!(and_single, or_single);
        }
    }
}

// Property: NOT is the complement of OR over the known document set
proptest! {
    #[test]
    fn boolean_not_is_complement(
        docs in prop::collection::vec(document(), 1..6),
        query in text(2),
    ) {
        let mut index = InvertedIndex::new(10_000);
        let mut all_ids = BTreeSet::new();
        for (i, (id, title, content)) in docs.iter().enumerate() {
            let full_id = format!("{}-{}", id, i);
            all_ids.insert(full_id.clone());
            index.add_document(build_doc(&full_id, title, content));
        }

        if tokenize(&query).is_empty() {
            return Ok(());
        }

        let or: BTreeSet<String> = index
            .boolean_search(&query, BooleanOperator::Or)
            .into_iter()
            .collect();
        let not: BTreeSet<String> = index
            .boolean_search(&query, BooleanOperator::Not)
            .into_iter()
            .collect();

        prop_assert!(or.is_disjoint(&not));
        let union: BTreeSet<String> = or.union(&not).cloned().collect();
        prop_assert_eq!(union, all_ids);
    }
}
