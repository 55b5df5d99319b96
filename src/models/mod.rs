// src/models/mod.rs

//! Domain models for the newsroom client.
//!
//! One explicit schema per endpoint payload; responses are validated at the
//! boundary by deserializing into these types.

mod article;
mod config;
mod media;
mod section;
mod taxonomy;
mod user;

// Re-export all public types
pub use article::{Article, ArticleInput, ArticleStatus, ArticleSummary, slugify};
pub use config::{
    API_BASE_ENV, ApiConfig, Config, DateRangePolicy, ListingConfig, LoggingConfig, SessionConfig,
};
pub use media::{MediaAsset, MediaUpload};
pub use section::{HomepageSection, SectionInput, SectionItem, SectionItemInput};
pub use taxonomy::{Category, CategoryRef, Created, Tag, TagRef, TaxonomyInput};
pub use user::{LoginRequest, LoginResponse, User, UserInput};
