//! Process-local library store.
//!
//! [`InMemoryLibraryStore`] implements the book, user and loan repository
//! ports over a single mutex-guarded state, so one instance can back every
//! service at once. It enforces the same storage rules as the PostgreSQL
//! schema: identifiers start at 1 and grow monotonically, at most one active
//! loan exists per title, and deleting a user drops their ledger entries.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    BookRepository, BookRepositoryError, BookTypeCount, LoanRepository, LoanRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    Book, BookId, BookName, BookType, LoanId, LoanRecord, LoanStatus, NewBook, NewLoan, NewUser,
    User, UserId, UserName,
};

#[derive(Debug, Default)]
struct StoreState {
    books: Vec<Book>,
    users: Vec<User>,
    loans: Vec<LoanRecord>,
    last_book_id: i64,
    last_user_id: i64,
    last_loan_id: i64,
}

impl StoreState {
    fn has_active_loan(&self, book_name: &BookName) -> bool {
        self.loans
            .iter()
            .any(|loan| loan.status() == LoanStatus::Loaned && loan.book_name() == book_name)
    }

    fn push_loan(&mut self, loan: NewLoan, status: LoanStatus) -> LoanRecord {
        self.last_loan_id += 1;
        let record = LoanRecord::new(
            LoanId::new(self.last_loan_id),
            loan.user_id,
            loan.book_name,
            status,
        );
        self.loans.push(record.clone());
        record
    }
}

/// Mutex-guarded store implementing every repository port.
#[derive(Debug, Default)]
pub struct InMemoryLibraryStore {
    state: Mutex<StoreState>,
}

impl InMemoryLibraryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation completes under a single guard, so the state stays
    // consistent even if a holder panicked.
    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a ledger entry in the given status.
    ///
    /// Used to stage histories that cannot be reached through the services
    /// alone, such as a user holding several returned copies. Seeding an
    /// active loan still honours the one-active-loan-per-title rule.
    ///
    /// # Errors
    ///
    /// Returns [`LoanRepositoryError::AlreadyLoaned`] when `status` is
    /// [`LoanStatus::Loaned`] and the title is already out.
    pub fn seed_loan(
        &self,
        user_id: UserId,
        book_name: BookName,
        status: LoanStatus,
    ) -> Result<LoanRecord, LoanRepositoryError> {
        let mut state = self.state();
        if status == LoanStatus::Loaned && state.has_active_loan(&book_name) {
            return Err(LoanRepositoryError::already_loaned(book_name));
        }
        Ok(state.push_loan(NewLoan { user_id, book_name }, status))
    }

    /// Copy of the catalogue in insertion order.
    pub fn books_snapshot(&self) -> Vec<Book> {
        self.state().books.clone()
    }

    /// Copy of the directory in insertion order.
    pub fn users_snapshot(&self) -> Vec<User> {
        self.state().users.clone()
    }

    /// Copy of the ledger in insertion order.
    pub fn loans_snapshot(&self) -> Vec<LoanRecord> {
        self.state().loans.clone()
    }
}

#[async_trait]
impl BookRepository for InMemoryLibraryStore {
    async fn insert(&self, book: &NewBook) -> Result<Book, BookRepositoryError> {
        let mut state = self.state();
        state.last_book_id += 1;
        let stored = book.clone().with_id(BookId::new(state.last_book_id));
        state.books.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_name(&self, name: &BookName) -> Result<Option<Book>, BookRepositoryError> {
        Ok(self
            .state()
            .books
            .iter()
            .find(|book| book.name() == name)
            .cloned())
    }

    async fn count_by_type(&self) -> Result<Vec<BookTypeCount>, BookRepositoryError> {
        let state = self.state();
        Ok(BookType::ALL
            .into_iter()
            .map(|book_type| BookTypeCount {
                book_type,
                count: state
                    .books
                    .iter()
                    .filter(|book| book.book_type() == book_type)
                    .count() as u64,
            })
            .filter(|entry| entry.count > 0)
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryLibraryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut state = self.state();
        state.last_user_id += 1;
        let stored = user.clone().with_id(UserId::new(state.last_user_id));
        state.users.push(stored.clone());
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self.users_snapshot())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|user| user.id() == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|user| user.name() == name)
            .cloned())
    }

    async fn update_name(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut state = self.state();
        let stored = state
            .users
            .iter_mut()
            .find(|stored| stored.id() == user.id())
            .ok_or_else(|| UserRepositoryError::not_found(user.id()))?;
        stored.rename(user.name().clone());
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), UserRepositoryError> {
        let mut state = self.state();
        let before = state.users.len();
        state.users.retain(|user| user.id() != id);
        if state.users.len() == before {
            return Err(UserRepositoryError::not_found(id));
        }

        let loans_before = state.loans.len();
        state.loans.retain(|loan| loan.user_id() != id);
        debug!(
            user_id = %id,
            dropped_loans = loans_before - state.loans.len(),
            "deleted user from in-memory store"
        );
        Ok(())
    }
}

#[async_trait]
impl LoanRepository for InMemoryLibraryStore {
    async fn insert(&self, loan: &NewLoan) -> Result<LoanRecord, LoanRepositoryError> {
        let mut state = self.state();
        if state.has_active_loan(&loan.book_name) {
            return Err(LoanRepositoryError::already_loaned(loan.book_name.clone()));
        }
        Ok(state.push_loan(loan.clone(), LoanStatus::Loaned))
    }

    async fn find_active_by_book_name(
        &self,
        book_name: &BookName,
    ) -> Result<Option<LoanRecord>, LoanRepositoryError> {
        Ok(self
            .state()
            .loans
            .iter()
            .find(|loan| loan.status() == LoanStatus::Loaned && loan.book_name() == book_name)
            .cloned())
    }

    async fn mark_returned(&self, id: LoanId) -> Result<(), LoanRepositoryError> {
        let mut state = self.state();
        let loan = state
            .loans
            .iter_mut()
            .find(|loan| loan.id() == id)
            .ok_or_else(|| LoanRepositoryError::not_active(id))?;
        loan.mark_returned()
            .map_err(|_| LoanRepositoryError::not_active(id))
    }

    async fn count_by_status(&self, status: LoanStatus) -> Result<u64, LoanRepositoryError> {
        Ok(self
            .state()
            .loans
            .iter()
            .filter(|loan| loan.status() == status)
            .count() as u64)
    }

    async fn find_all(&self) -> Result<Vec<LoanRecord>, LoanRepositoryError> {
        Ok(self.loans_snapshot())
    }
}
