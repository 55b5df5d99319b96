//! Article query layer.
//!
//! - `FilterState` / `FilterChange`: what the user asked for
//! - `ArticleQuery` / `MediaQuery`: canonical server query parameters
//! - `SearchDebouncer`: commits free-text input once typing pauses
//! - `refine`: client-side narrowing of an already-fetched page
//! - `Pagination`: page/offset bookkeeping without a total count
//! - `select_featured`: hero article selection

mod builder;
mod debounce;
mod featured;
mod filter;
mod pagination;
mod refine;

pub use builder::{ArticleQuery, MediaQuery};
pub use debounce::{DebounceState, SearchDebouncer};
pub use featured::{select_featured, sort_by_recency};
pub use filter::{FilterChange, FilterState};
pub use pagination::Pagination;
pub use refine::{matches_term, refine};
