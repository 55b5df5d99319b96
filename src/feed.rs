// src/feed.rs

//! Article feed for one listing view.
//!
//! The feed composes the query layer into the state a listing page shows:
//! filters, pagination, the fetched page, the refined (visible) page, and
//! the featured article.
//!
//! ## Request tagging
//!
//! Every fetch is spawned as its own task and tagged with a generation
//! number plus the filter snapshot it was issued for. Issuing a new fetch
//! cancels the previous one; an outcome whose tag is not the latest is
//! discarded, so a slow earlier response can never overwrite a newer one.
//! [`ArticleFeed::teardown`] (or dropping the feed) cancels everything.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::client::ApiClient;
use crate::error::{AppError, Result};
use crate::models::{ArticleSummary, DateRangePolicy, ListingConfig};
use crate::query::{
    ArticleQuery, FilterChange, FilterState, Pagination, SearchDebouncer, refine, select_featured,
};

/// Anything that can serve a page of articles.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<Vec<ArticleSummary>>;
}

#[async_trait]
impl ArticleSource for ApiClient {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<Vec<ArticleSummary>> {
        ApiClient::list_articles(self, query).await
    }
}

/// Per-view listing settings.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub page_size: u32,
    pub date_range: DateRangePolicy,
    pub search_debounce: Duration,
    /// Filters the view starts from (page is always 1)
    pub initial_filters: FilterState,
}

impl FeedSettings {
    /// Settings from the `[listing]` config section.
    pub fn from_config(config: &ListingConfig) -> Self {
        let mut initial_filters = FilterState::new();
        initial_filters.apply(FilterChange::Status(config.default_status));
        Self {
            page_size: config.page_size,
            date_range: config.date_range,
            search_debounce: Duration::from_millis(config.search_debounce_ms),
            initial_filters,
        }
    }

    pub fn with_filters(mut self, filters: FilterState) -> Self {
        self.initial_filters = filters;
        self
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self::from_config(&ListingConfig::default())
    }
}

/// Identifies one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub filters: FilterState,
}

/// A completed fetch, tagged with the ticket it was issued for.
#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<Vec<ArticleSummary>>,
}

/// What [`ArticleFeed::receive`] did with an outcome.
#[derive(Debug)]
pub enum FeedUpdate {
    /// The page was replaced
    Applied { fetched: usize, visible: usize },
    /// The network failed; the page is now empty
    Degraded(AppError),
    /// Any other failure; the previous page, filters and pagination are kept
    Failed(AppError),
    /// Superseded or torn down; ignored
    Stale,
}

/// Listing state for one view.
pub struct ArticleFeed {
    source: Arc<dyn ArticleSource>,
    policy: DateRangePolicy,
    search_debounce: Duration,
    filters: FilterState,
    pagination: Pagination,
    /// Filters and pagination of the page on display
    shown: (FilterState, Pagination),
    fetched: Vec<ArticleSummary>,
    visible: Vec<ArticleSummary>,
    featured: Option<ArticleSummary>,
    generation: u64,
    in_flight: Option<CancellationToken>,
    root: CancellationToken,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl ArticleFeed {
    /// Create a feed. Nothing is fetched until [`refresh`](Self::refresh)
    /// or a filter change.
    pub fn new(source: Arc<dyn ArticleSource>, settings: FeedSettings) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let mut filters = settings.initial_filters;
        filters.apply(FilterChange::Page(1));
        let pagination = Pagination::new(settings.page_size);

        Self {
            source,
            policy: settings.date_range,
            search_debounce: settings.search_debounce,
            shown: (filters.clone(), pagination.clone()),
            filters,
            pagination,
            fetched: Vec::new(),
            visible: Vec::new(),
            featured: None,
            generation: 0,
            in_flight: None,
            root: CancellationToken::new(),
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// The page as the server returned it.
    pub fn fetched(&self) -> &[ArticleSummary] {
        &self.fetched
    }

    /// The fetched page narrowed by the active search term.
    pub fn visible(&self) -> &[ArticleSummary] {
        &self.visible
    }

    pub fn featured(&self) -> Option<&ArticleSummary> {
        self.featured.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_torn_down(&self) -> bool {
        self.root.is_cancelled()
    }

    /// A search debouncer stopped together with this feed.
    ///
    /// Apply its commits with `FilterChange::Search`.
    pub fn search_debouncer(&self) -> (SearchDebouncer, mpsc::UnboundedReceiver<String>) {
        SearchDebouncer::spawn_with_token(self.search_debounce, self.root.child_token())
    }

    /// Apply a filter change and fetch the resulting page.
    ///
    /// A rejected change leaves the current state untouched. Any change
    /// other than a page change forgets the last page length, so "next"
    /// stays disabled until a page for the new filters arrives.
    pub fn apply(&mut self, change: FilterChange) -> Result<FetchTicket> {
        if self.root.is_cancelled() {
            return Err(torn_down());
        }
        let page_only = change.is_page_only();
        let mut next = self.filters.clone();
        next.apply(change);
        next.validate(self.policy)?;

        self.filters = next;
        if page_only {
            self.pagination.set_page(self.filters.page());
        } else {
            self.pagination.reset();
        }
        self.issue()
    }

    /// Next page. `Ok(None)` when the last page was not full.
    pub fn next_page(&mut self) -> Result<Option<FetchTicket>> {
        if !self.pagination.can_next() {
            return Ok(None);
        }
        let Some(page) = self.pagination.page().checked_add(1) else {
            return Ok(None);
        };
        self.apply(FilterChange::Page(page)).map(Some)
    }

    /// Previous page. `Ok(None)` on the first page.
    pub fn prev_page(&mut self) -> Result<Option<FetchTicket>> {
        if !self.pagination.can_prev() {
            return Ok(None);
        }
        let page = self.pagination.page() - 1;
        self.apply(FilterChange::Page(page)).map(Some)
    }

    /// Change the page size; the view goes back to page 1.
    pub fn set_page_size(&mut self, page_size: u32) -> Result<FetchTicket> {
        if self.root.is_cancelled() {
            return Err(torn_down());
        }
        self.pagination.set_page_size(page_size);
        self.filters.apply(FilterChange::Page(1));
        self.issue()
    }

    /// Re-fetch the current filters.
    pub fn refresh(&mut self) -> Result<FetchTicket> {
        self.issue()
    }

    fn issue(&mut self) -> Result<FetchTicket> {
        if self.root.is_cancelled() {
            return Err(torn_down());
        }
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            filters: self.filters.clone(),
        };
        let query = ArticleQuery::from_filters(&self.filters, self.pagination.page_size());
        let token = self.root.child_token();
        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        let task_ticket = ticket.clone();
        let task_token = token.clone();

        log::debug!(
            "Fetch #{} issued: {}",
            ticket.generation,
            query.to_query_string()
        );
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = task_token.cancelled() => {
                    log::debug!("Fetch #{} cancelled", task_ticket.generation);
                }
                result = source.list_articles(&query) => {
                    let _ = tx.send(FetchOutcome { ticket: task_ticket, result });
                }
            }
        });

        self.in_flight = Some(token);
        Ok(ticket)
    }

    /// Incorporate a completed fetch.
    pub fn receive(&mut self, outcome: FetchOutcome) -> FeedUpdate {
        let FetchOutcome { ticket, result } = outcome;
        if self.root.is_cancelled()
            || ticket.generation != self.generation
            || ticket.filters != self.filters
        {
            log::debug!(
                "Discarding stale fetch #{} (latest #{})",
                ticket.generation,
                self.generation
            );
            return FeedUpdate::Stale;
        }

        self.in_flight = None;
        match result {
            Ok(page) => {
                self.pagination.record_page(page.len());
                self.fetched = page;
                self.recompute();
                self.mark_shown();
                FeedUpdate::Applied {
                    fetched: self.fetched.len(),
                    visible: self.visible.len(),
                }
            }
            Err(error) if error.is_network() => {
                log::warn!("Article fetch failed, showing no results: {}", error);
                self.pagination.record_page(0);
                self.fetched.clear();
                self.recompute();
                self.mark_shown();
                FeedUpdate::Degraded(error)
            }
            Err(error) => {
                log::warn!("Article fetch failed: {}", error);
                let (filters, pagination) = self.shown.clone();
                self.filters = filters;
                self.pagination = pagination;
                FeedUpdate::Failed(error)
            }
        }
    }

    /// Wait for the in-flight fetch and incorporate it.
    ///
    /// Returns `None` when nothing is in flight or the feed was torn down.
    pub async fn settle(&mut self) -> Option<FeedUpdate> {
        while self.in_flight.is_some() {
            let outcome = tokio::select! {
                biased;
                () = self.root.cancelled() => return None,
                outcome = self.outcome_rx.recv() => outcome?,
            };
            match self.receive(outcome) {
                FeedUpdate::Stale => continue,
                update => return Some(update),
            }
        }
        None
    }

    fn mark_shown(&mut self) {
        self.shown = (self.filters.clone(), self.pagination.clone());
    }

    /// Refinement and hero selection, redone for every page or search change.
    fn recompute(&mut self) {
        self.visible = match self.filters.search_term() {
            Some(term) => refine(&self.fetched, term),
            None => self.fetched.clone(),
        };
        self.featured = select_featured(&self.visible).cloned();
    }

    /// Cancel all outstanding work. Later outcomes are ignored.
    pub fn teardown(&mut self) {
        self.root.cancel();
        self.in_flight = None;
        self.outcome_rx.close();
        log::debug!("Feed torn down at fetch #{}", self.generation);
    }
}

fn torn_down() -> AppError {
    AppError::validation("feed has been torn down")
}

impl Drop for ArticleFeed {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

impl std::fmt::Debug for ArticleFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleFeed")
            .field("filters", &self.filters)
            .field("pagination", &self.pagination)
            .field("generation", &self.generation)
            .field("visible", &self.visible.len())
            .finish_non_exhaustive()
    }
}
