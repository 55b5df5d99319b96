// src/query/filter.rs

//! Listing filter state.

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::{ArticleStatus, DateRangePolicy};

/// Filters of a listing view. `page` is always >= 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub category: Option<String>,
    pub status: Option<ArticleStatus>,
    pub is_highlight: Option<bool>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Committed search term (not the raw input)
    pub search_text: String,
    page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: None,
            status: None,
            is_highlight: None,
            date_from: None,
            date_to: None,
            search_text: String::new(),
            page: 1,
        }
    }
}

/// A single user-driven change to a [`FilterState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Category(Option<String>),
    Status(Option<ArticleStatus>),
    Highlight(Option<bool>),
    DateFrom(Option<NaiveDate>),
    DateTo(Option<NaiveDate>),
    ClearDates,
    Search(String),
    Page(u32),
}

impl FilterChange {
    /// Pure pagination changes keep the current filters and page semantics.
    pub fn is_page_only(&self) -> bool {
        matches!(self, FilterChange::Page(_))
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters for a single category, e.g. a category landing page.
    pub fn for_category(slug: impl Into<String>) -> Self {
        let mut state = Self::default();
        state.apply(FilterChange::Category(Some(slug.into())));
        state
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Apply a change. Every change except [`FilterChange::Page`] resets
    /// the page to 1. Returns whether the state differs afterwards.
    pub fn apply(&mut self, change: FilterChange) -> bool {
        let before = self.clone();
        let page_only = change.is_page_only();

        match change {
            FilterChange::Category(category) => self.category = non_empty(category),
            FilterChange::Status(status) => self.status = status,
            FilterChange::Highlight(flag) => self.is_highlight = flag,
            FilterChange::DateFrom(date) => self.date_from = date,
            FilterChange::DateTo(date) => self.date_to = date,
            FilterChange::ClearDates => {
                self.date_from = None;
                self.date_to = None;
            }
            FilterChange::Search(text) => self.search_text = text,
            FilterChange::Page(page) => self.page = page.max(1),
        }

        if !page_only {
            self.page = 1;
        }

        *self != before
    }

    /// Active search term: trimmed, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search_text.trim();
        (!term.is_empty()).then_some(term)
    }

    /// True when both dates are set and `date_from` is after `date_to`.
    pub fn is_date_range_inverted(&self) -> bool {
        matches!((self.date_from, self.date_to), (Some(from), Some(to)) if from > to)
    }

    /// Check the filters against the configured date range rule.
    pub fn validate(&self, policy: DateRangePolicy) -> Result<()> {
        if policy == DateRangePolicy::Reject && self.is_date_range_inverted() {
            return Err(AppError::validation(format!(
                "date range start {} is after end {}",
                self.date_from.map(|d| d.to_string()).unwrap_or_default(),
                self.date_to.map(|d| d.to_string()).unwrap_or_default(),
            )));
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn on_page(page: u32) -> FilterState {
        let mut state = FilterState::for_category("world");
        state.apply(FilterChange::Page(page));
        state
    }

    #[test]
    fn test_default_page_is_one() {
        assert_eq!(FilterState::new().page(), 1);
    }

    #[test]
    fn test_every_filter_change_resets_page() {
        let changes = vec![
            FilterChange::Category(Some("sports".into())),
            FilterChange::Category(None),
            FilterChange::Status(Some(ArticleStatus::Draft)),
            FilterChange::Highlight(Some(true)),
            FilterChange::DateFrom(Some(date(2024, 1, 1))),
            FilterChange::DateTo(Some(date(2024, 2, 1))),
            FilterChange::ClearDates,
            FilterChange::Search("cats".into()),
            // Same value again still counts as a filter change
            FilterChange::Category(Some("world".into())),
        ];

        for change in changes {
            let mut state = on_page(4);
            state.apply(change.clone());
            assert_eq!(state.page(), 1, "{change:?} should reset the page");
        }
    }

    #[test]
    fn test_page_change_keeps_filters() {
        let mut state = FilterState::for_category("world");
        state.apply(FilterChange::Search("cats".into()));
        assert!(state.apply(FilterChange::Page(3)));
        assert_eq!(state.page(), 3);
        assert_eq!(state.category.as_deref(), Some("world"));
        assert_eq!(state.search_text, "cats");
    }

    #[test]
    fn test_page_zero_clamps_to_one() {
        let mut state = on_page(2);
        state.apply(FilterChange::Page(0));
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_empty_category_is_unset() {
        let mut state = FilterState::new();
        state.apply(FilterChange::Category(Some("  ".into())));
        assert_eq!(state.category, None);
    }

    #[test]
    fn test_apply_reports_no_change() {
        let mut state = FilterState::new();
        assert!(!state.apply(FilterChange::ClearDates));
        assert!(state.apply(FilterChange::Highlight(Some(false))));
    }

    #[test]
    fn test_search_term_trims() {
        let mut state = FilterState::new();
        state.apply(FilterChange::Search("   ".into()));
        assert_eq!(state.search_term(), None);
        state.apply(FilterChange::Search("  cat ".into()));
        assert_eq!(state.search_term(), Some("cat"));
    }

    #[test]
    fn test_inverted_range_policy() {
        let mut state = FilterState::new();
        state.apply(FilterChange::DateFrom(Some(date(2024, 3, 1))));
        state.apply(FilterChange::DateTo(Some(date(2024, 1, 1))));

        assert!(state.is_date_range_inverted());
        assert!(state.validate(DateRangePolicy::PassThrough).is_ok());
        assert!(matches!(
            state.validate(DateRangePolicy::Reject),
            Err(AppError::Validation(_))
        ));

        state.apply(FilterChange::DateTo(None));
        assert!(state.validate(DateRangePolicy::Reject).is_ok());
    }
}
