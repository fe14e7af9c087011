//! Port for book catalogue persistence.
//!
//! Adapters store [`Book`] records and answer the category aggregation used by
//! catalogue statistics.

use async_trait::async_trait;

use crate::domain::{Book, BookName, BookType, NewBook};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by book repository adapters.
    pub enum BookRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "book repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "book repository query failed: {message}",
    }
}

/// Number of catalogue entries in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookTypeCount {
    /// Category being counted.
    pub book_type: BookType,
    /// Books stored under the category. Always at least one.
    pub count: u64,
}

/// Port for book catalogue storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a book and return it with its store-issued identifier.
    ///
    /// Titles are not unique; inserting the same name twice stores two books.
    async fn insert(&self, book: &NewBook) -> Result<Book, BookRepositoryError>;

    /// Fetch the first book (lowest identifier) with the given title.
    async fn find_by_name(&self, name: &BookName) -> Result<Option<Book>, BookRepositoryError>;

    /// Count books per category.
    ///
    /// Only categories with at least one book are returned; ordering is left
    /// to the adapter.
    async fn count_by_type(&self) -> Result<Vec<BookTypeCount>, BookRepositoryError>;
}
