use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A submitted URL with a description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub url: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Whether `url` or `description` contains `needle`, ignoring ASCII case.
    ///
    /// Mirrors SQLite's default `LIKE` semantics so both stores filter the
    /// feed identically.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_ascii_lowercase();
        self.url.to_ascii_lowercase().contains(&needle)
            || self.description.to_ascii_lowercase().contains(&needle)
    }
}

/// A text reply attached to a link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    pub link_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a link
#[derive(Debug, Clone, Deserialize)]
pub struct NewLink {
    pub url: String,
    pub description: String,
}

/// Input for creating a comment
#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub body: String,
    pub link_id: Option<i64>,
}
