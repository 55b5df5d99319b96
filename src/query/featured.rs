// src/query/featured.rs

//! Hero ("featured") article selection.

use crate::models::ArticleSummary;

/// Most recent featured article, else the most recent article overall.
///
/// Undated articles rank below dated ones; ties keep input order.
pub fn select_featured(articles: &[ArticleSummary]) -> Option<&ArticleSummary> {
    most_recent(articles.iter().filter(|a| a.is_featured)).or_else(|| most_recent(articles.iter()))
}

/// Sort newest first, undated last. Stable.
pub fn sort_by_recency(articles: &mut [ArticleSummary]) {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

fn most_recent<'a>(iter: impl Iterator<Item = &'a ArticleSummary>) -> Option<&'a ArticleSummary> {
    iter.fold(None, |best, article| match best {
        Some(b) if b.published_at >= article.published_at => Some(b),
        _ => Some(article),
    })
}
