//! Homepage sections and their curated items.

use serde::{Deserialize, Serialize};

/// A homepage section (e.g. "top-stories").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HomepageSection {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub title: String,
}

/// Create/update payload for a section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionInput {
    pub key: String,
    pub title: String,
}

/// An article placed in a section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionItem {
    pub id: String,
    pub section_id: String,
    pub article_id: String,
    #[serde(default)]
    pub position: i32,
}

/// Create/update payload for a section item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionItemInput {
    pub section_id: String,
    pub article_id: String,
    pub position: i32,
}
