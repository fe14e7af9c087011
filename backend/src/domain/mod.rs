//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed library entities and the services that
//! operate on them through ports. Keep types transport agnostic and document
//! invariants and serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — domain error payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Book, User, LoanRecord — catalogue entry, directory entry, ledger entry.
//! - BookService, UserService — implementations of the driving ports.

pub mod book;
pub mod book_service;
pub mod error;
pub mod loan;
pub mod ports;
mod repository_error_mapping;
pub mod user;
pub mod user_service;

pub use self::book::{
    Book, BookId, BookName, BookType, BookValidationError, NewBook, ParseBookTypeError,
};
pub use self::book_service::BookService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::loan::{
    LoanId, LoanRecord, LoanStatus, LoanTransitionError, NewLoan, ParseLoanStatusError,
};
pub use self::repository_error_mapping::ALREADY_ON_LOAN;
pub use self::user::{NewUser, User, UserId, UserName, UserValidationError};
pub use self::user_service::UserService;

impl From<BookValidationError> for Error {
    fn from(value: BookValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use library_backend::domain::{DomainResult, UserName};
///
/// fn parse(raw: &str) -> DomainResult<UserName> {
///     Ok(UserName::new(raw)?)
/// }
///
/// assert!(parse("A").is_ok());
/// assert!(parse("  ").is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
