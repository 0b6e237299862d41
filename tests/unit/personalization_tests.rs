//! Personalization re-ranker tests

use cascade_search::domain::types::{
    BehaviorData, Demographics, GeoLocation, ProfileUpdate, SearchContext, SearchResult,
    UserAction, UserPreferences,
};
use cascade_search::layers::personalization::{PersonalizationLayer, PersonalizationWeights};
use chrono::{Duration, TimeZone, Utc};

fn result(id: &str, score: f64, metadata: serde_json::Value) -> SearchResult {
    SearchResult {
        id: id.to_string(),
        title: format!("Title {}", id),
        content: "neutral body text".to_string(),
        url: None,
        score,
        metadata,
    }
}

fn layer() -> PersonalizationLayer {
    PersonalizationLayer::new(PersonalizationWeights::default())
}

/// A timestamp where no category hour/weekday table matches anything:
/// 03:00 UTC on a Wednesday.
fn quiet_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 3, 3, 0, 0).unwrap()
}

#[tokio::test]
async fn no_signals_leave_scores_untouched() {
    let layer = layer();
    let results = vec![
        result("a", 0.9, serde_json::json!({})),
        result("b", 0.5, serde_json::json!({})),
    ];
    let outcome = layer.rerank(results, None, None, quiet_time(), 20).await;

    assert_eq!(outcome.results[0].id, "a");
    assert!((outcome.results[0].score - 0.9).abs() < 1e-12);
    assert!((outcome.results[1].score - 0.5).abs() < 1e-12);
    assert!((outcome.personalization_score - 0.1).abs() < 1e-12);
}

#[tokio::test]
async fn category_preference_and_click_history_boost() {
    let layer = layer();
    layer
        .update_profile(
            "u1",
            ProfileUpdate {
                preferences: Some(UserPreferences {
                    categories: vec!["technology".to_string()],
                    ..UserPreferences::default()
                }),
                demographics: None,
            },
        )
        .await;
    layer
        .record_behavior(
            "u1",
            UserAction::Click,
            &BehaviorData {
                document_id: Some("d1".to_string()),
                ..BehaviorData::default()
            },
        )
        .await
        .unwrap();

    let results = vec![result(
        "d1",
        1.0,
        serde_json::json!({ "category": "technology" }),
    )];
    let outcome = layer
        .rerank(results, Some("u1"), None, quiet_time(), 20)
        .await;

    // 0.20 category + 0.15 click, weighted by 0.3
    let expected = 1.0 + 0.35 * 0.3;
    assert!((outcome.results[0].score - expected).abs() < 1e-9);
    assert!(
        (outcome.results[0].metadata["personalization_boost"]
            .as_f64()
            .unwrap()
            - 0.35)
            .abs()
            < 1e-9
    );
}

#[tokio::test]
async fn search_history_overlap_is_capped() {
    let layer = layer();
    for _ in 0..10 {
        layer
            .record_behavior(
                "u1",
                UserAction::Search,
                &BehaviorData {
                    query: Some("neutral text".to_string()),
                    ..BehaviorData::default()
                },
            )
            .await
            .unwrap();
    }

    let results = vec![result("d1", 1.0, serde_json::json!({}))];
    let outcome = layer
        .rerank(results, Some("u1"), None, quiet_time(), 20)
        .await;

    // each past query matches twice, but the overlap boost caps at 0.20
    let boost = outcome.results[0].metadata["personalization_boost"]
        .as_f64()
        .unwrap();
    assert!((boost - 0.20).abs() < 1e-9);
}

#[tokio::test]
async fn time_spent_boost_is_capped() {
    let layer = layer();
    layer
        .record_behavior(
            "u1",
            UserAction::TimeSpent,
            &BehaviorData {
                document_id: Some("d1".to_string()),
                time_spent: Some(90_000),
                ..BehaviorData::default()
            },
        )
        .await
        .unwrap();

    let results = vec![result("d1", 1.0, serde_json::json!({}))];
    let outcome = layer
        .rerank(results, Some("u1"), None, quiet_time(), 20)
        .await;

    let boost = outcome.results[0].metadata["personalization_boost"]
        .as_f64()
        .unwrap();
    assert!((boost - 0.10).abs() < 1e-9);
}

#[tokio::test]
async fn demographics_age_and_interests_boost() {
    let layer = layer();
    layer
        .update_profile(
            "u1",
            ProfileUpdate {
                preferences: None,
                demographics: Some(Demographics {
                    age: Some(25),
                    location: None,
                    interests: vec!["rust".to_string(), "gardening".to_string()],
                }),
            },
        )
        .await;

    let results = vec![result(
        "d1",
        1.0,
        serde_json::json!({ "age_group": "young_adult", "tags": ["rustlang", "systems"] }),
    )];
    let outcome = layer
        .rerank(results, Some("u1"), None, quiet_time(), 20)
        .await;

    // 0.10 age bucket + 0.15 * (1 of 2 interests matched)
    let boost = outcome.results[0].metadata["personalization_boost"]
        .as_f64()
        .unwrap();
    assert!((boost - (0.10 + 0.075)).abs() < 1e-9);
}

#[tokio::test]
async fn location_boost_uses_its_fixed_weight() {
    let layer = layer();
    let context = SearchContext {
        location: Some(GeoLocation {
            lat: 40.0,
            lng: -74.0,
            radius: None,
        }),
        timestamp: None,
        device: None,
        session_id: None,
        previous_queries: Vec::new(),
    };

    let results = vec![result(
        "d1",
        1.0,
        serde_json::json!({ "location": { "lat": 40.0, "lng": -74.0 } }),
    )];
    let outcome = layer
        .rerank(results, None, Some(&context), quiet_time(), 20)
        .await;

    // distance < 1 km -> 0.20, under the fixed location weight 0.1
    let expected = 1.0 + 0.20 * 0.1;
    assert!((outcome.results[0].score - expected).abs() < 1e-9);
    assert!(
        (outcome.results[0].metadata["context_boost"].as_f64().unwrap() - 0.20).abs() < 1e-9
    );
}

#[tokio::test]
async fn device_match_boosts_under_context_weight() {
    let layer = layer();
    let context = SearchContext {
        device: Some("mobile".to_string()),
        ..SearchContext::default()
    };

    let results = vec![result(
        "d1",
        1.0,
        serde_json::json!({ "mobile_optimized": true }),
    )];
    let outcome = layer
        .rerank(results, None, Some(&context), quiet_time(), 20)
        .await;

    let expected = 1.0 + 0.10 * 0.2;
    assert!((outcome.results[0].score - expected).abs() < 1e-9);
}

#[tokio::test]
async fn prior_query_overlap_is_capped() {
    let layer = layer();
    let context = SearchContext {
        previous_queries: vec![
            "neutral text".to_string(),
            "neutral body".to_string(),
            "neutral words".to_string(),
        ],
        ..SearchContext::default()
    };

    let results = vec![result("d1", 1.0, serde_json::json!({}))];
    let outcome = layer
        .rerank(results, None, Some(&context), quiet_time(), 20)
        .await;

    // the accumulated 0.03-per-hit overlap exceeds the cap of 0.10
    let boost = outcome.results[0].metadata["context_boost"].as_f64().unwrap();
    assert!((boost - 0.10).abs() < 1e-9);
}

#[tokio::test]
async fn temporal_boost_matches_hour_day_and_recency() {
    let layer = layer();
    // Monday 07:00 UTC: news hour and news weekday both match
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap();
    let created = now - Duration::minutes(30);

    let results = vec![result(
        "d1",
        1.0,
        serde_json::json!({ "category": "news", "created_at": created.to_rfc3339() }),
    )];
    let outcome = layer.rerank(results, None, None, now, 20).await;

    // 0.05 hour + 0.03 weekday + 0.10 recency, under temporal weight 0.1
    let boost = outcome.results[0].metadata["temporal_boost"].as_f64().unwrap();
    assert!((boost - 0.18).abs() < 1e-9);
    let expected = 1.0 + 0.18 * 0.1;
    assert!((outcome.results[0].score - expected).abs() < 1e-9);
}

#[tokio::test]
async fn recency_tiers_decay() {
    let layer = layer();
    let now = quiet_time();
    let cases = [
        (Duration::hours(5), 0.05),
        (Duration::hours(100), 0.02),
        (Duration::hours(300), 0.0),
    ];

    for (age, expected) in cases {
        let created = now - age;
        let results = vec![result(
            "d1",
            1.0,
            serde_json::json!({ "created_at": created.to_rfc3339() }),
        )];
        let outcome = layer.rerank(results, None, None, now, 20).await;
        let boost = outcome.results[0].metadata["temporal_boost"].as_f64().unwrap();
        assert!(
            (boost - expected).abs() < 1e-9,
            "age {:?} expected {}",
            age,
            expected
        );
    }
}

#[tokio::test]
async fn results_are_resorted_and_truncated() {
    let layer = PersonalizationLayer::new(PersonalizationWeights::default());
    layer
        .record_behavior(
            "u1",
            UserAction::Click,
            &BehaviorData {
                document_id: Some("c".to_string()),
                ..BehaviorData::default()
            },
        )
        .await
        .unwrap();

    let results = vec![
        result("a", 1.00, serde_json::json!({})),
        result("b", 0.99, serde_json::json!({})),
        result("c", 0.98, serde_json::json!({})),
    ];
    let outcome = layer
        .rerank(results, Some("u1"), None, quiet_time(), 2)
        .await;

    // c gains 0.98 * (1 + 0.15 * 0.3) ~= 1.024 and overtakes a
    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.results[0].id, "c");
    assert_eq!(outcome.results[1].id, "a");
}

#[tokio::test]
async fn personalization_score_sums_applicable_weights() {
    let layer = layer();
    let context = SearchContext::default();
    let outcome = layer
        .rerank(Vec::new(), Some("u1"), Some(&context), quiet_time(), 20)
        .await;
    assert!((outcome.personalization_score - 0.6).abs() < 1e-12);

    let heavy = PersonalizationLayer::new(PersonalizationWeights {
        user_profile_weight: 0.9,
        context_weight: 0.5,
        temporal_weight: 0.1,
    });
    let outcome = heavy
        .rerank(Vec::new(), Some("u1"), Some(&context), quiet_time(), 20)
        .await;
    assert_eq!(outcome.personalization_score, 1.0);
}
