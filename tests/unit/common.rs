//! Shared builders for unit tests

use cascade_search::domain::types::Document;

/// Minimal document with empty metadata
pub fn doc(id: &str, title: &str, content: &str) -> Document {
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

