//! Driving port for catalogue and ledger statistics.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{BookType, Error};

/// Number of books stored under one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookStatResponse {
    /// Category.
    #[serde(rename = "type")]
    pub book_type: BookType,
    /// Books in the category.
    pub count: u64,
}

/// Driving port for read-only statistics.
#[async_trait]
pub trait BookQuery: Send + Sync {
    /// Number of loans currently out.
    ///
    /// # Errors
    ///
    /// Returns a service-unavailable or internal error when persistence fails.
    async fn count_loaned_books(&self) -> Result<u64, Error>;

    /// One entry per category that has at least one book, in category
    /// declaration order.
    ///
    /// # Errors
    ///
    /// Returns a service-unavailable or internal error when persistence fails.
    async fn book_statistics(&self) -> Result<Vec<BookStatResponse>, Error>;
}
