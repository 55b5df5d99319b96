// src/query/builder.rs

//! Canonical query parameters for listing endpoints.

use chrono::NaiveDate;
use url::form_urlencoded;

use crate::models::ArticleStatus;
use crate::query::FilterState;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters of `GET /api/articles/`.
///
/// Optional keys are emitted only when set; `limit` and `offset` always are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    pub limit: u32,
    pub offset: u64,
    pub category: Option<String>,
    pub status: Option<ArticleStatus>,
    pub is_highlight: Option<bool>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self::new(20, 0)
    }
}

impl ArticleQuery {
    pub fn new(limit: u32, offset: u64) -> Self {
        Self {
            limit,
            offset,
            category: None,
            status: None,
            is_highlight: None,
            date_from: None,
            date_to: None,
        }
    }

    /// Build the query for the current page of `filters`.
    ///
    /// The search term is not part of the server query; it is applied
    /// client-side by [`crate::query::refine`].
    pub fn from_filters(filters: &FilterState, page_size: u32) -> Self {
        let offset = u64::from(filters.page().saturating_sub(1)) * u64::from(page_size);
        Self {
            limit: page_size,
            offset,
            category: filters.category.clone(),
            status: filters.status,
            is_highlight: filters.is_highlight,
            date_from: filters.date_from,
            date_to: filters.date_to,
        }
    }

    /// Ordered key/value pairs: limit, offset, category, status,
    /// is_highlight, dateFrom, dateTo.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];

        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(flag) = self.is_highlight {
            pairs.push(("is_highlight", if flag { "1" } else { "0" }.to_string()));
        }
        if let Some(from) = self.date_from {
            pairs.push(("dateFrom", from.format(DATE_FORMAT).to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("dateTo", to.format(DATE_FORMAT).to_string()));
        }

        pairs
    }

    /// URL-encoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        encode(&self.to_pairs())
    }
}

/// Parameters of `GET /api/media/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaQuery {
    pub q: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

impl MediaQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }

    pub fn to_query_string(&self) -> String {
        encode(&self.to_pairs())
    }
}

fn encode(pairs: &[(&'static str, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .finish()
}
