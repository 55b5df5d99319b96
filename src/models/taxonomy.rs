//! Categories and tags.

use serde::{Deserialize, Serialize};

/// Category reference embedded in articles. No back-link ownership.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// A category as returned by `/api/categories/`.
pub type Category = CategoryRef;

/// Tag reference embedded in articles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// A tag as returned by `/api/tags/`.
pub type Tag = TagRef;

/// Create/update payload shared by categories and tags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxonomyInput {
    pub name: String,
    pub slug: String,
}

impl TaxonomyInput {
    /// Build a payload, deriving the slug from the name when none is given.
    pub fn new(name: impl Into<String>, slug: Option<String>) -> Self {
        let name = name.into();
        let slug = slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| crate::models::slugify(&name));
        Self { name, slug }
    }
}

/// Response of create endpoints that only echo the new id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Created {
    pub id: String,
}
