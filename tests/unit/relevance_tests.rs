//! Relevance scorer tests

use crate::common::doc;
use cascade_search::domain::types::RankingMethod;
use cascade_search::layers::relevance::{Bm25Params, RelevanceScorer};
use cascade_search::tokenizer::tokenize;

fn seeded_scorer() -> RelevanceScorer {
    let mut scorer = RelevanceScorer::new(1_000);
    scorer.add_document(doc(
        "d1",
        "Machine Learning",
        "algorithms that learn from data",
    ));
    scorer.add_document(doc(
        "d2",
        "Deep Learning",
        "neural networks with multiple layers",
    ));
    scorer
}

fn ids(results: &[cascade_search::domain::types::SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn scores_only_matching_candidates() {
    let scorer = seeded_scorer();
    let query = tokenize("neural networks");
    let results = scorer.score(&query, &["d1".to_string(), "d2".to_string()]);

    assert_eq!(ids(&results), vec!["d2"]);
    assert!(results[0].score > 0.0);
}

#[test]
fn result_metadata_carries_breakdown_and_length() {
    let scorer = seeded_scorer();
    let query = tokenize("neural networks");
    let results = scorer.score(&query, &["d2".to_string()]);

    let metadata = &results[0].metadata;
    assert_eq!(metadata["document_length"], 6);
    let breakdown = metadata["score_breakdown"].as_object().unwrap();
    assert!(breakdown.contains_key("neural"));
    assert!(breakdown.contains_key("networks"));

    let total: f64 = breakdown.values().map(|v| v.as_f64().unwrap()).sum();
    assert!((total - results[0].score).abs() < 1e-9);
}

#[test]
fn higher_term_frequency_does_not_score_lower() {
    let mut scorer = RelevanceScorer::new(1_000);
    scorer.add_document(doc("once", "Coffee", "coffee with milk milk milk"));
    scorer.add_document(doc("thrice", "Coffee", "coffee coffee coffee with milk"));

    let query = tokenize("coffee");
    let results = scorer.score(&query, &["once".to_string(), "thrice".to_string()]);
    assert_eq!(ids(&results), vec!["thrice", "once"]);
}

#[test]
fn excerpt_is_truncated_to_200_chars() {
    let long_content = "words ".repeat(100);
    let mut scorer = RelevanceScorer::new(1_000);
    scorer.add_document(doc("long", "Long Document", &long_content));

    let query = tokenize("words");
    let results = scorer.score(&query, &["long".to_string()]);
    let content = &results[0].content;
    assert_eq!(content.chars().count(), 201);
    assert!(content.ends_with('…'));
}

#[test]
fn tfidf_alternative_matches_the_formula() {
    let mut scorer = RelevanceScorer::with_params(
        1_000,
        Bm25Params::default(),
        RankingMethod::TfIdf,
    );
    scorer.add_document(doc(
        "d1",
        "Machine Learning",
        "algorithms that learn from data",
    ));
    scorer.add_document(doc(
        "d2",
        "Deep Learning",
        "neural networks with multiple layers",
    ));

    let query = tokenize("neural");
    let results = scorer.score(&query, &["d1".to_string(), "d2".to_string()]);

    // tf = 1, |d| = 6, df = 1, N = 2 -> (1/6) * ln(2)
    assert_eq!(ids(&results), vec!["d2"]);
    let expected = (1.0 / 6.0) * 2.0f64.ln();
    assert!((results[0].score - expected).abs() < 1e-9);
}

#[test]
fn average_length_tracks_mutations() {
    let mut scorer = RelevanceScorer::new(1_000);
    assert_eq!(scorer.avg_document_length(), 0.0);

    scorer.add_document(doc("d1", "Machine Learning", "algorithms that learn from data"));
    assert!((scorer.avg_document_length() - 6.0).abs() < f64::EPSILON);

    scorer.add_document(doc("d2", "Ranking", "search ranking pipeline"));
    // lengths 6 and 4
    assert!((scorer.avg_document_length() - 5.0).abs() < f64::EPSILON);

    assert!(scorer.remove_document("d2"));
    assert!((scorer.avg_document_length() - 6.0).abs() < f64::EPSILON);

    assert!(scorer.remove_document("d1"));
    assert_eq!(scorer.avg_document_length(), 0.0);
}

#[test]
fn document_frequency_drops_to_zero_on_remove() {
    let mut scorer = seeded_scorer();
    assert_eq!(scorer.document_frequency("learning"), 2);
    assert_eq!(scorer.document_frequency("neural"), 1);

    scorer.remove_document("d2");
    assert_eq!(scorer.document_frequency("learning"), 1);
    assert_eq!(scorer.document_frequency("neural"), 0);
}

#[test]
fn results_are_capped() {
    let mut scorer = RelevanceScorer::new(2);
    for i in 0..5 {
        scorer.add_document(doc(
            &format!("d{}", i),
            "Shared Topic",
            "ranking retrieval cascade",
        ));
    }
    let candidates: Vec<String> = (0..5).map(|i| format!("d{}", i)).collect();
    let results = scorer.score(&tokenize("ranking"), &candidates);
    assert_eq!(results.len(), 2);
}

#[test]
fn unknown_candidates_are_skipped() {
    let scorer = seeded_scorer();
    let results = scorer.score(&tokenize("learning"), &["ghost".to_string()]);
    assert!(results.is_empty());
}
