//! Inverted index tests

use crate::common::doc;
use cascade_search::domain::types::BooleanOperator;
use cascade_search::layers::InvertedIndex;

fn seeded_index() -> InvertedIndex {
    let mut index = InvertedIndex::new(10_000);
    index.add_document(doc(
        "d1",
        "Machine Learning",
        "algorithms that learn from data",
    ));
    index.add_document(doc(
        "d2",
        "Deep Learning",
        "neural networks with multiple layers",
    ));
    index
}

#[test]
fn candidates_are_the_union_of_posting_lists() {
    let index = seeded_index();
    let candidates = index.candidates("learning");
    assert_eq!(candidates, vec!["d1".to_string(), "d2".to_string()]);
}

#[test]
fn empty_query_yields_no_candidates() {
    let index = seeded_index();
    assert!(index.candidates("").is_empty());
    assert!(index.candidates("of the and").is_empty());
}

#[test]
fn unknown_terms_yield_no_candidates() {
    let index = seeded_index();
    assert!(index.candidates("quantum").is_empty());
}

#[test]
fn boolean_and_requires_every_token() {
    let index = seeded_index();
    let results = index.boolean_search("machine deep", BooleanOperator::And);
    assert!(results.is_empty());

    let results = index.boolean_search("neural networks", BooleanOperator::And);
    assert_eq!(results, vec!["d2".to_string()]);
}

#[test]
fn boolean_or_is_the_union() {
    let index = seeded_index();
    let results = index.boolean_search("machine deep", BooleanOperator::Or);
    assert_eq!(results, vec!["d1".to_string(), "d2".to_string()]);
}

#[test]
fn boolean_not_is_the_complement() {
    let index = seeded_index();
    let results = index.boolean_search("machine", BooleanOperator::Not);
    assert_eq!(results, vec!["d2".to_string()]);

    let results = index.boolean_search("learning", BooleanOperator::Not);
    assert!(results.is_empty());
}

#[test]
fn candidate_truncation_is_deterministic_ascending() {
    let mut index = InvertedIndex::new(2);
    index.add_document(doc("c", "shared term", "common words here"));
    index.add_document(doc("a", "shared term", "common words here"));
    index.add_document(doc("b", "shared term", "common words here"));

    let candidates = index.candidates("shared");
    assert_eq!(candidates, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn remove_restores_statistics() {
    let mut index = seeded_index();
    let before = index.stats();

    index.add_document(doc("d3", "Transfer Learning", "reuse pretrained networks"));
    assert_eq!(index.stats().documents, 3);

    assert!(index.remove_document("d3"));
    let after = index.stats();
    assert_eq!(before.documents, after.documents);
    assert_eq!(before.unique_terms, after.unique_terms);
    assert_eq!(before.total_tokens, after.total_tokens);
    assert!(index.check_invariants());
}

#[test]
fn remove_unknown_id_returns_false() {
    let mut index = seeded_index();
    assert!(!index.remove_document("missing"));
}

#[test]
fn readding_a_document_replaces_it() {
    let mut index = seeded_index();
    index.add_document(doc("d1", "Databases", "relational storage engines"));

    assert!(index.candidates("machine").is_empty());
    assert_eq!(index.candidates("relational"), vec!["d1".to_string()]);
    assert_eq!(index.len(), 2);
    assert!(index.check_invariants());
}

#[test]
fn stats_track_totals_and_averages() {
    let index = seeded_index();
    let stats = index.stats();
    // d1: machine, learning, algorithms, learn, from, data (6)
    // d2: deep, learning, neural, networks, multiple, layers (6)
    assert_eq!(stats.documents, 2);
    assert_eq!(stats.total_tokens, 12);
    assert!((stats.avg_tokens_per_document - 6.0).abs() < f64::EPSILON);
    assert_eq!(stats.unique_terms, 11);
}
