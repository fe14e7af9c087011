//! Shared mapping from repository port failures to domain errors.
//!
//! Connection failures surface as service-unavailable, query failures as
//! internal errors. Variants that carry domain meaning are mapped by the
//! services themselves before falling back to these helpers.

use tracing::warn;

use super::Error;
use super::ports::{BookRepositoryError, LoanRepositoryError, UserRepositoryError};

pub(crate) fn map_book_repository_error(error: BookRepositoryError) -> Error {
    match error {
        BookRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("book repository unavailable: {message}"))
        }
        BookRepositoryError::Query { message } => {
            Error::internal(format!("book repository error: {message}"))
        }
    }
}

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::NotFound { id } => Error::not_found(format!("user {id} not found")),
    }
}

pub(crate) fn map_loan_repository_error(error: LoanRepositoryError) -> Error {
    match error {
        LoanRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("loan repository unavailable: {message}"))
        }
        LoanRepositoryError::Query { message } => {
            Error::internal(format!("loan repository error: {message}"))
        }
        LoanRepositoryError::AlreadyLoaned { .. } => Error::invalid_state(ALREADY_ON_LOAN),
        LoanRepositoryError::NotActive { id } => {
            warn!(loan_id = %id, "active loan changed state before it could be returned");
            Error::not_found(format!("loan {id} is no longer active"))
        }
    }
}

/// Fixed message for attempts to lend a title that is already out.
pub const ALREADY_ON_LOAN: &str = "book is already on loan";
