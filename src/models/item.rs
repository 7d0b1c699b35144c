use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rough classification of a harvested link, derived from title keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Article,
    Event,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Event => "event",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "article" => Some(ContentType::Article),
            "event" => Some(ContentType::Event),
            _ => None,
        }
    }
}

/// A candidate item produced by extraction, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub source_website: String,
    pub content_type: ContentType,
    pub venue: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

/// A persisted item. Append-only: rows are never updated, and inserting
/// an already-known URL leaves the existing row untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub summary: String,
    pub source_website: String,
    pub content_type: ContentType,
    pub venue: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub scraped_at: DateTime<Utc>,
}

/// An item paired with its relevance score for a search query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub item: Item,
    pub relevance_score: f64,
}
