//! Boost computation rules
//!
//! Pure functions mapping a result plus personalization signals to boost
//! fractions. Each rule reads only documented metadata keys: `category`,
//! `tags`, `age_group`, `mobile_optimized`, `desktop_optimized`,
//! `location` and `created_at`.

use crate::domain::types::{SearchContext, SearchResult, UserProfile};
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

/// Earth radius in kilometers for the haversine distance
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Cap on the accumulated search-history overlap boost
const SEARCH_OVERLAP_CAP: f64 = 0.20;
/// Cap on the accumulated prior-query overlap boost
const PRIOR_QUERY_CAP: f64 = 0.10;
/// Cap on the dwell-time boost
const TIME_SPENT_CAP: f64 = 0.10;

/// User-profile boost: preference, behavior and demographic matches
pub fn profile_boost(profile: &UserProfile, result: &SearchResult) -> f64 {
    let mut boost = 0.0;

    if let Some(category) = metadata_str(result, "category") {
        if profile
            .preferences
            .categories
            .iter()
            .any(|preferred| preferred.as_str() == category)
        {
            boost += 0.20;
        }
    }

    if profile
        .behavior
        .click_history
        .iter()
        .any(|id| id == &result.id)
    {
        boost += 0.15;
    }

    let haystack = format!("{} {}", result.title, result.content).to_lowercase();
    let mut overlap = 0.0;
    'queries: for query in &profile.behavior.search_history {
        for word in query.split_whitespace() {
            if haystack.contains(&word.to_lowercase()) {
                overlap += 0.05;
                if overlap >= SEARCH_OVERLAP_CAP {
                    break 'queries;
                }
            }
        }
    }
    boost += overlap.min(SEARCH_OVERLAP_CAP);

    if let Some(millis) = profile.behavior.time_spent.get(&result.id) {
        boost += (*millis as f64 / 1000.0).min(TIME_SPENT_CAP);
    }

    if let Some(demographics) = &profile.demographics {
        if let (Some(age), Some(age_group)) = (demographics.age, metadata_str(result, "age_group"))
        {
            if age_bucket_contains(age_group, age) {
                boost += 0.10;
            }
        }

        if !demographics.interests.is_empty() {
            let tags = metadata_tags(result);
            if !tags.is_empty() {
                let matched = demographics
                    .interests
                    .iter()
                    .filter(|interest| {
                        let interest = interest.to_lowercase();
                        tags.iter().any(|tag| tag.contains(&interest))
                    })
                    .count();
                boost += 0.15 * matched as f64 / demographics.interests.len() as f64;
            }
        }
    }

    boost
}

/// Contextual boost, returned as `(location, other)` because the
/// location part carries its own fixed weight.
pub fn context_boost(context: &SearchContext, result: &SearchResult) -> (f64, f64) {
    let mut location_boost = 0.0;
    if let (Some(user), Some((lat, lng))) = (context.location, metadata_location(result)) {
        let distance = haversine_km(user.lat, user.lng, lat, lng);
        location_boost = if distance < 1.0 {
            0.20
        } else if distance < 5.0 {
            0.10
        } else if distance < 10.0 {
            0.05
        } else {
            0.0
        };
    }

    let mut other = 0.0;
    match context.device.as_deref() {
        Some("mobile") if metadata_flag(result, "mobile_optimized") => other += 0.10,
        Some("desktop") if metadata_flag(result, "desktop_optimized") => other += 0.05,
        _ => {}
    }

    // Session affinity is reserved and contributes nothing yet.

    let haystack = format!("{} {}", result.title, result.content).to_lowercase();
    let mut overlap = 0.0;
    'queries: for query in &context.previous_queries {
        for word in query.split_whitespace() {
            if haystack.contains(&word.to_lowercase()) {
                overlap += 0.03;
                if overlap >= PRIOR_QUERY_CAP {
                    break 'queries;
                }
            }
        }
    }
    other += overlap.min(PRIOR_QUERY_CAP);

    (location_boost, other)
}

/// Temporal boost from hour-of-day, day-of-week and document recency
pub fn temporal_boost(result: &SearchResult, now: DateTime<Utc>) -> f64 {
    let mut boost = 0.0;

    if let Some(category) = metadata_str(result, "category") {
        if category_hours(category).contains(&now.hour()) {
            boost += 0.05;
        }
        if category_weekdays(category).contains(&now.weekday()) {
            boost += 0.03;
        }
    }

    if let Some(created_at) = metadata_created_at(result) {
        let age_hours = (now - created_at).num_seconds() as f64 / 3600.0;
        if age_hours >= 0.0 {
            if age_hours < 1.0 {
                boost += 0.10;
            } else if age_hours < 24.0 {
                boost += 0.05;
            } else if age_hours < 168.0 {
                boost += 0.02;
            }
        }
    }

    boost
}

fn category_hours(category: &str) -> &'static [u32] {
    match category {
        "news" => &[6, 7, 8, 18, 19, 20],
        "entertainment" => &[19, 20, 21, 22, 23],
        "work" => &[9, 10, 11, 14, 15, 16],
        "shopping" => &[10, 11, 12, 15, 16, 17, 20, 21],
        _ => &[],
    }
}

fn category_weekdays(category: &str) -> &'static [Weekday] {
    use Weekday::*;
    match category {
        "work" => &[Mon, Tue, Wed, Thu, Fri],
        "entertainment" => &[Fri, Sat, Sun],
        "shopping" => &[Sat, Sun],
        "news" => &[Mon, Tue, Wed, Thu, Fri, Sat, Sun],
        _ => &[],
    }
}

fn age_bucket_contains(age_group: &str, age: u32) -> bool {
    let (min, max) = match age_group {
        "teen" => (13, 19),
        "young_adult" => (20, 30),
        "adult" => (31, 50),
        "senior" => (51, 100),
        _ => return false,
    };
    (min..=max).contains(&age)
}

/// Great-circle distance between two points in kilometers
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

fn metadata_str<'a>(result: &'a SearchResult, key: &str) -> Option<&'a str> {
    result.metadata.get(key).and_then(|value| value.as_str())
}

fn metadata_flag(result: &SearchResult, key: &str) -> bool {
    result
        .metadata
        .get(key)
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

fn metadata_tags(result: &SearchResult) -> Vec<String> {
    result
        .metadata
        .get("tags")
        .and_then(|value| value.as_array())
        .map(|tags| {
            tags.iter()
                .filter_map(|tag| tag.as_str())
                .map(str::to_lowercase)
                .collect()
        })
        .unwrap_or_default()
}

fn metadata_location(result: &SearchResult) -> Option<(f64, f64)> {
    let location = result.metadata.get("location")?;
    let lat = location.get("lat")?.as_f64()?;
    let lng = location.get("lng")?.as_f64()?;
    Some((lat, lng))
}

fn metadata_created_at(result: &SearchResult) -> Option<DateTime<Utc>> {
    let raw = result.metadata.get("created_at")?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
