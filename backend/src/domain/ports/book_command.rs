//! Driving port for catalogue and loan mutations.
//!
//! Callers hand in already-validated names; blank titles or user names are
//! rejected when the request is built or deserialised.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Book, BookName, BookType, Error, LoanRecord, UserName};

/// Request to add a book to the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    /// Title of the new book.
    pub name: BookName,
    /// Category; [`BookType::Unspecified`] when omitted.
    #[serde(rename = "type", default)]
    pub book_type: Option<BookType>,
}

/// Request to lend a book to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookLoanRequest {
    /// Borrower, looked up by name.
    pub user_name: UserName,
    /// Title being lent.
    pub book_name: BookName,
}

/// Request to hand a borrowed book back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookReturnRequest {
    /// Borrower, looked up by name.
    pub user_name: UserName,
    /// Title being returned.
    pub book_name: BookName,
}

/// Driving port for catalogue inserts and the loan workflow.
#[async_trait]
pub trait BookCommand: Send + Sync {
    /// Add a book to the catalogue.
    ///
    /// # Errors
    ///
    /// Returns a service-unavailable or internal error when persistence fails.
    async fn save_book(&self, request: BookRequest) -> Result<Book, Error>;

    /// Lend a book.
    ///
    /// # Errors
    ///
    /// - Not found when the user or the catalogue title does not exist.
    /// - Invalid state when the title already has an active loan.
    async fn loan_book(&self, request: BookLoanRequest) -> Result<LoanRecord, Error>;

    /// Return a borrowed book.
    ///
    /// # Errors
    ///
    /// Not found when the user does not exist or holds no active loan for the
    /// title.
    async fn return_book(&self, request: BookReturnRequest) -> Result<LoanRecord, Error>;
}
