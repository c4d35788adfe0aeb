//! Voter directory: the external, read-only store of voter records.
//!
//! The directory exposes a single query. Backends are constructed once at
//! startup and shared behind `Arc<dyn VoterDirectory>`.

#[cfg(test)]
pub(crate) mod fake;
mod rest;
mod sqlite;

pub use rest::RestDirectory;
pub use sqlite::{init_directory, SqliteDirectory};
#[cfg(test)]
pub(crate) use sqlite::insert_voter;

use async_trait::async_trait;

use crate::models::{SearchParams, VoterRecord};

/// Transport-level failure reaching the directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The service could not be reached (connect failure, timeout).
    #[error("directory unreachable: {0}")]
    Network(String),
    /// The service answered but the query failed or the reply was unusable.
    #[error("directory service error: {0}")]
    Service(String),
}

/// Query capability of the voter directory.
///
/// Implementations match the date of birth exactly, the ward against every
/// candidate in [`crate::models::WardQuery::candidates`], and, when present,
/// the name fragment case-insensitively as a substring. An empty match is
/// `Ok(vec![])`, never an error.
#[async_trait]
pub trait VoterDirectory: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn search(&self, params: &SearchParams) -> Result<Vec<VoterRecord>, DirectoryError>;
}
