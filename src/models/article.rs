// src/models/article.rs

//! Article data structures.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{CategoryRef, TagRef};
use crate::utils::time::deserialize_lenient;

/// Editorial status of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ArticleStatus {
    /// Wire value used in query strings and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
            ArticleStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(ArticleStatus::Draft),
            "published" => Ok(ArticleStatus::Published),
            "archived" => Ok(ArticleStatus::Archived),
            other => Err(AppError::validation(format!("unknown article status '{other}'"))),
        }
    }
}

/// An article as returned by the listing endpoint.
///
/// Immutable once fetched; a re-fetch replaces the whole page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleSummary {
    pub id: String,

    #[serde(default)]
    pub slug: String,

    pub title: String,

    /// Standfirst shown on cards; may be absent
    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub hero_image_url: Option<String>,

    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: ArticleStatus,

    #[serde(default)]
    pub is_highlight: bool,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub is_breaking: bool,

    #[serde(default)]
    pub categories: Vec<CategoryRef>,
}

impl ArticleSummary {
    /// Summary text, empty when absent.
    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }
}

/// A full article record, as returned by the detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    #[serde(flatten)]
    pub summary: ArticleSummary,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub primary_category_id: Option<String>,

    #[serde(default)]
    pub tags: Vec<TagRef>,
}

/// Create/update payload for an article.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArticleInput {
    pub title: String,
    pub summary: String,
    pub body: String,
    pub slug: String,
    pub hero_image_url: String,
    pub primary_category_id: String,
    pub category_ids: Vec<String>,
    pub tag_ids: Vec<String>,
    pub status: ArticleStatus,
    pub is_breaking: bool,
    pub is_highlight: bool,
    pub is_featured: bool,
    /// Empty when unscheduled
    pub published_at: String,
}

impl ArticleInput {
    /// Start an editor form from an existing article.
    ///
    /// The primary category falls back to the first assigned category.
    pub fn from_article(article: &Article) -> Self {
        let s = &article.summary;
        let primary_category_id = article
            .primary_category_id
            .clone()
            .or_else(|| s.categories.first().map(|c| c.id.clone()))
            .unwrap_or_default();

        Self {
            title: s.title.clone(),
            summary: s.summary_text().to_string(),
            body: article.body.clone(),
            slug: s.slug.clone(),
            hero_image_url: s.hero_image_url.clone().unwrap_or_default(),
            primary_category_id,
            category_ids: s.categories.iter().map(|c| c.id.clone()).collect(),
            tag_ids: article.tags.iter().map(|t| t.id.clone()).collect(),
            status: s.status,
            is_breaking: s.is_breaking,
            is_highlight: s.is_highlight,
            is_featured: s.is_featured,
            published_at: s.published_at.map(|d| d.to_rfc3339()).unwrap_or_default(),
        }
    }

    /// Fill `slug` from the title.
    pub fn generate_slug(&mut self) {
        self.slug = slugify(&self.title);
    }

    /// Add the id if missing, remove it otherwise.
    pub fn toggle_category(&mut self, id: &str) {
        toggle(&mut self.category_ids, id);
    }

    /// Add the id if missing, remove it otherwise.
    pub fn toggle_tag(&mut self, id: &str) {
        toggle(&mut self.tag_ids, id);
    }
}

fn toggle(values: &mut Vec<String>, id: &str) {
    if let Some(pos) = values.iter().position(|v| v == id) {
        values.remove(pos);
    } else {
        values.push(id.to_string());
    }
}

/// Build a URL slug: lowercase ASCII alphanumerics joined by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Élection 2024: résultats  "), "lection-2024-r-sultats");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("Already-slugged"), "already-slugged");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Published".parse::<ArticleStatus>().unwrap(), ArticleStatus::Published);
        assert!("deleted".parse::<ArticleStatus>().is_err());
        assert_eq!(ArticleStatus::Archived.to_string(), "archived");
    }

    #[test]
    fn test_summary_deserialize_minimal() {
        let json = r#"{"id": "a1", "title": "Cats rule", "published_at": null}"#;
        let article: ArticleSummary = serde_json::from_str(json).unwrap();
        assert_eq!(article.slug, "");
        assert_eq!(article.summary_text(), "");
        assert!(article.published_at.is_none());
        assert!(!article.is_featured);
        assert_eq!(article.status, ArticleStatus::Draft);
    }

    #[test]
    fn test_article_deserialize_full() {
        let json = r#"{
            "id": "a1",
            "slug": "cats-rule",
            "title": "Cats rule",
            "summary": "Why cats win",
            "status": "published",
            "published_at": "2024-02-01T08:00:00",
            "is_featured": true,
            "categories": [{"id": "c1", "name": "Pets", "slug": "pets"}],
            "tags": [{"id": "t1", "name": "Cats", "slug": "cats"}],
            "body": "<p>Meow</p>"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.summary.status, ArticleStatus::Published);
        assert!(article.summary.published_at.is_some());
        assert_eq!(article.tags.len(), 1);

        let input = ArticleInput::from_article(&article);
        assert_eq!(input.primary_category_id, "c1");
        assert_eq!(input.category_ids, vec!["c1".to_string()]);
        assert_eq!(input.tag_ids, vec!["t1".to_string()]);
        assert!(input.is_featured);
    }

    #[test]
    fn test_toggle_category() {
        let mut input = ArticleInput::default();
        input.toggle_category("c1");
        input.toggle_category("c2");
        input.toggle_category("c1");
        assert_eq!(input.category_ids, vec!["c2".to_string()]);
    }

    #[test]
    fn test_generate_slug() {
        let mut input = ArticleInput {
            title: "Breaking: Rust 2.0".into(),
            ..ArticleInput::default()
        };
        input.generate_slug();
        assert_eq!(input.slug, "breaking-rust-2-0");
    }
}
