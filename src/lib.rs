// src/lib.rs

//! Newsroom CMS client library.
//!
//! Typed access to the CMS REST API plus the article query layer used by
//! listing views: filter state, query building, debounced search,
//! client-side refinement, pagination and featured-article selection.

pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod query;
pub mod session;
pub mod utils;
