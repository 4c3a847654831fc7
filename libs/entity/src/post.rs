use std::fmt;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub name: String,
    #[serde(default)]
    pub password: String,
    pub categories: Category,
    pub created_at: DateTime<Utc>,
}

// Keeps the author secret out of logs.
impl fmt::Debug for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Post")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("categories", &self.categories)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Create payload for `POST /api/boards`. The service assigns `id` and owns
/// the final `createdAt`.
#[derive(PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub name: String,
    pub password: String,
    pub categories: Category,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for NewPost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewPost")
            .field("title", &self.title)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("categories", &self.categories)
            .finish_non_exhaustive()
    }
}

#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
)]
pub enum Category {
    #[default]
    #[serde(rename = "유머")]
    #[strum(serialize = "유머")]
    Humor,
    #[serde(rename = "개인")]
    #[strum(serialize = "개인")]
    Personal,
    #[serde(rename = "궁금증")]
    #[strum(serialize = "궁금증")]
    Question,
    #[serde(rename = "진로진학")]
    #[strum(serialize = "진로진학")]
    Career,
    #[serde(rename = "기타")]
    #[strum(serialize = "기타")]
    Other,
}

/// Form value of the "unselected" tag option. Never a stored category.
pub const UNSELECTED_CATEGORY: &str = "none";

impl Category {
    pub fn parse_label(label: &str) -> anyhow::Result<Self> {
        label
            .parse::<Category>()
            .with_context(|| format!("unknown category label: {}", label))
    }
}
