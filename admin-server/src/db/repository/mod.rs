//! Repository Module
//!
//! CRUD operations per collection, as free async functions over the
//! SQLite pool. Soft deletes flip `is_active` and return `bool`;
//! updates use COALESCE merges so absent payload fields keep the
//! stored value.

pub mod franchise;
pub mod guest;
pub mod menu_item;
pub mod offer;
pub mod session;
pub mod staff;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Row not found".to_string()),
            other => RepoError::Database(other.to_string()),
        }
    }
}

/// Repository result type
pub type RepoResult<T> = Result<T, RepoError>;
