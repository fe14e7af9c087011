//! Book catalogue and loan ledger services.
//!
//! [`BookService`] implements the catalogue insert, the loan/return workflow
//! and the read-side statistics. Loans are keyed by book title: a title may be
//! out with at most one user at a time, and a returned title can be lent again.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    BookCommand, BookLoanRequest, BookQuery, BookRepository, BookRequest, BookReturnRequest,
    BookStatResponse, LoanRepository, UserRepository,
};
use crate::domain::repository_error_mapping::{
    ALREADY_ON_LOAN, map_book_repository_error, map_loan_repository_error,
    map_user_repository_error,
};
use crate::domain::{
    Book, BookName, Error, LoanRecord, LoanStatus, NewBook, NewLoan, User, UserName,
};

/// Catalogue and ledger service implementing the book driving ports.
#[derive(Clone)]
pub struct BookService<B, U, L> {
    book_repo: Arc<B>,
    user_repo: Arc<U>,
    loan_repo: Arc<L>,
}

impl<B, U, L> BookService<B, U, L> {
    /// Create a new service over the catalogue, directory and ledger.
    pub fn new(book_repo: Arc<B>, user_repo: Arc<U>, loan_repo: Arc<L>) -> Self {
        Self {
            book_repo,
            user_repo,
            loan_repo,
        }
    }
}

impl<B, U, L> BookService<B, U, L>
where
    B: BookRepository,
    U: UserRepository,
    L: LoanRepository,
{
    async fn require_user(&self, name: &UserName) -> Result<User, Error> {
        self.user_repo
            .find_by_name(name)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {name} not found")))
    }

    async fn require_book(&self, name: &BookName) -> Result<Book, Error> {
        self.book_repo
            .find_by_name(name)
            .await
            .map_err(map_book_repository_error)?
            .ok_or_else(|| Error::not_found(format!("book {name} not found")))
    }

    async fn active_loan(&self, name: &BookName) -> Result<Option<LoanRecord>, Error> {
        self.loan_repo
            .find_active_by_book_name(name)
            .await
            .map_err(map_loan_repository_error)
    }
}

#[async_trait]
impl<B, U, L> BookCommand for BookService<B, U, L>
where
    B: BookRepository,
    U: UserRepository,
    L: LoanRepository,
{
    async fn save_book(&self, request: BookRequest) -> Result<Book, Error> {
        let book = NewBook {
            name: request.name,
            book_type: request.book_type.unwrap_or_default(),
        };

        self.book_repo
            .insert(&book)
            .await
            .map_err(map_book_repository_error)
    }

    async fn loan_book(&self, request: BookLoanRequest) -> Result<LoanRecord, Error> {
        let user = self.require_user(&request.user_name).await?;
        let book = self.require_book(&request.book_name).await?;

        if self.active_loan(book.name()).await?.is_some() {
            return Err(Error::invalid_state(ALREADY_ON_LOAN));
        }

        // The adapter re-checks on insert, so a concurrent loan of the same
        // title still surfaces as AlreadyLoaned.
        let loan = NewLoan {
            user_id: user.id(),
            book_name: book.name().clone(),
        };
        self.loan_repo
            .insert(&loan)
            .await
            .map_err(map_loan_repository_error)
    }

    async fn return_book(&self, request: BookReturnRequest) -> Result<LoanRecord, Error> {
        let user = self.require_user(&request.user_name).await?;

        let mut loan = self
            .active_loan(&request.book_name)
            .await?
            .filter(|loan| loan.user_id() == user.id())
            .ok_or_else(|| {
                Error::not_found(format!(
                    "user {} has no active loan for book {}",
                    request.user_name, request.book_name
                ))
            })?;

        loan.mark_returned()
            .map_err(|err| Error::invalid_state(err.to_string()))?;
        self.loan_repo
            .mark_returned(loan.id())
            .await
            .map_err(map_loan_repository_error)?;

        Ok(loan)
    }
}

#[async_trait]
impl<B, U, L> BookQuery for BookService<B, U, L>
where
    B: BookRepository,
    U: UserRepository,
    L: LoanRepository,
{
    async fn count_loaned_books(&self) -> Result<u64, Error> {
        self.loan_repo
            .count_by_status(LoanStatus::Loaned)
            .await
            .map_err(map_loan_repository_error)
    }

    async fn book_statistics(&self) -> Result<Vec<BookStatResponse>, Error> {
        let mut counts = self
            .book_repo
            .count_by_type()
            .await
            .map_err(map_book_repository_error)?;
        counts.sort_by_key(|entry| entry.book_type);

        Ok(counts
            .into_iter()
            .map(|entry| BookStatResponse {
                book_type: entry.book_type,
                count: entry.count,
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "book_service_tests.rs"]
mod tests;
