//! Utility functions and helpers.

pub mod time;
pub mod url;
