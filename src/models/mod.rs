//! Data models for the voter lookup service.
//!
//! Field names follow the directory's column names so rows decode without renaming.

mod search;
mod voter;

pub use search::*;
pub use voter::*;
