//! Port for the loan ledger.
//!
//! The ledger is append-mostly: records are inserted as active loans and only
//! ever change status once. Adapters guarantee the at-most-one-active-loan rule
//! per title at insert time, so two concurrent inserts for the same title
//! cannot both succeed.

use async_trait::async_trait;

use crate::domain::{BookName, LoanId, LoanRecord, LoanStatus, NewLoan};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by loan repository adapters.
    pub enum LoanRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "loan repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "loan repository query failed: {message}",
        /// Another active loan already exists for the title.
        AlreadyLoaned { book_name: String } => "book {book_name} already has an active loan",
        /// The loan is missing or no longer active.
        NotActive { id: LoanId } => "loan {id} is not active",
    }
}

/// Port for loan ledger storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Record a new active loan.
    ///
    /// Returns [`LoanRepositoryError::AlreadyLoaned`] when the title already
    /// has an active loan.
    async fn insert(&self, loan: &NewLoan) -> Result<LoanRecord, LoanRepositoryError>;

    /// Fetch the active loan for a title, if any.
    async fn find_active_by_book_name(
        &self,
        book_name: &BookName,
    ) -> Result<Option<LoanRecord>, LoanRepositoryError>;

    /// Flip an active loan to [`LoanStatus::Returned`].
    ///
    /// The update only applies while the stored status is still
    /// [`LoanStatus::Loaned`]; otherwise [`LoanRepositoryError::NotActive`] is
    /// returned.
    async fn mark_returned(&self, id: LoanId) -> Result<(), LoanRepositoryError>;

    /// Count records in the given status.
    async fn count_by_status(&self, status: LoanStatus) -> Result<u64, LoanRepositoryError>;

    /// Fetch the whole ledger ordered by identifier.
    async fn find_all(&self) -> Result<Vec<LoanRecord>, LoanRepositoryError>;
}
