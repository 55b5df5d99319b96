// src/query/refine.rs

//! Client-side refinement of a fetched page.
//!
//! Narrows only what the server already returned: a refined page can hold
//! fewer than `page_size` items even when other server pages have matches.

use crate::models::ArticleSummary;

/// True when title or summary contains `term`, ignoring case.
pub fn matches_term(article: &ArticleSummary, term: &str) -> bool {
    let needle = term.to_lowercase();
    article.title.to_lowercase().contains(&needle)
        || article.summary_text().to_lowercase().contains(&needle)
}

/// Keep the articles matching `term`. A blank term keeps everything.
pub fn refine(articles: &[ArticleSummary], term: &str) -> Vec<ArticleSummary> {
    let term = term.trim();
    if term.is_empty() {
        return articles.to_vec();
    }
    articles
        .iter()
        .filter(|a| matches_term(a, term))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleStatus;

    fn article(title: &str, summary: Option<&str>) -> ArticleSummary {
        ArticleSummary {
            id: title.to_lowercase(),
            slug: String::new(),
            title: title.to_string(),
            summary: summary.map(String::from),
            hero_image_url: None,
            published_at: None,
            status: ArticleStatus::Published,
            is_highlight: false,
            is_featured: false,
            is_breaking: false,
            categories: Vec::new(),
        }
    }

    fn titles(articles: &[ArticleSummary]) -> Vec<&str> {
        articles.iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn test_refine_by_title() {
        let page = vec![article("Cats rule", None), article("Dogs rule", None)];
        assert_eq!(titles(&refine(&page, "cat")), vec!["Cats rule"]);
    }

    #[test]
    fn test_refine_by_summary() {
        let page = vec![
            article("Weekend", Some("A CAT show in town")),
            article("Weather", Some("Rain")),
        ];
        assert_eq!(titles(&refine(&page, "Cat")), vec!["Weekend"]);
    }

    #[test]
    fn test_blank_term_keeps_all() {
        let page = vec![article("Cats rule", None), article("Dogs rule", None)];
        assert_eq!(refine(&page, "  ").len(), 2);
    }

    #[test]
    fn test_no_match() {
        let page = vec![article("Cats rule", None)];
        assert!(refine(&page, "parrot").is_empty());
    }
}
