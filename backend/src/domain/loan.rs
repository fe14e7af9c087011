//! Loan ledger records and the loan status state machine.
//!
//! A [`LoanRecord`] starts as [`LoanStatus::Loaned`] and moves once to
//! [`LoanStatus::Returned`]. Lending the same title again creates a fresh
//! record; returned records stay in the ledger as history.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{BookName, UserId};

/// Lifecycle state of a single loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    /// The book is out with the borrower.
    Loaned,
    /// The book came back.
    Returned,
}

impl LoanStatus {
    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loaned => "LOANED",
            Self::Returned => "RETURNED",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`LoanStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLoanStatusError {
    /// Rejected input.
    pub input: String,
}

impl fmt::Display for ParseLoanStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid loan status: {}", self.input)
    }
}

impl std::error::Error for ParseLoanStatusError {}

impl FromStr for LoanStatus {
    type Err = ParseLoanStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "LOANED" => Ok(Self::Loaned),
            "RETURNED" => Ok(Self::Returned),
            _ => Err(ParseLoanStatusError {
                input: value.to_owned(),
            }),
        }
    }
}

/// Store-generated loan identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(i64);

impl LoanId {
    /// Wrap a raw identifier issued by a repository.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejected loan status transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoanTransitionError {
    /// The loan was already returned.
    #[error("loan {id} has already been returned")]
    AlreadyReturned {
        /// Loan that rejected the transition.
        id: LoanId,
    },
}

/// Ledger entry linking a user to a borrowed title.
///
/// ## Invariants
/// - At most one record per `book_name` is [`LoanStatus::Loaned`]. Repository
///   adapters enforce this on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    id: LoanId,
    user_id: UserId,
    book_name: BookName,
    status: LoanStatus,
}

impl LoanRecord {
    /// Build a [`LoanRecord`] from stored components.
    pub fn new(id: LoanId, user_id: UserId, book_name: BookName, status: LoanStatus) -> Self {
        Self {
            id,
            user_id,
            book_name,
            status,
        }
    }

    /// Stable loan identifier.
    pub fn id(&self) -> LoanId {
        self.id
    }

    /// Borrower.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Borrowed title.
    pub fn book_name(&self) -> &BookName {
        &self.book_name
    }

    /// Current status.
    pub fn status(&self) -> LoanStatus {
        self.status
    }

    /// Whether the book has come back.
    pub fn is_returned(&self) -> bool {
        self.status == LoanStatus::Returned
    }

    /// Move the loan to [`LoanStatus::Returned`].
    ///
    /// # Errors
    ///
    /// Returns [`LoanTransitionError::AlreadyReturned`] when the record is no
    /// longer active.
    pub fn mark_returned(&mut self) -> Result<(), LoanTransitionError> {
        match self.status {
            LoanStatus::Loaned => {
                self.status = LoanStatus::Returned;
                Ok(())
            }
            LoanStatus::Returned => Err(LoanTransitionError::AlreadyReturned { id: self.id }),
        }
    }
}

/// Loan awaiting an identifier from the store. New loans are always active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    /// Borrower.
    pub user_id: UserId,
    /// Borrowed title.
    pub book_name: BookName,
}

impl NewLoan {
    /// Attach a store-issued identifier.
    pub fn with_id(self, id: LoanId) -> LoanRecord {
        LoanRecord::new(id, self.user_id, self.book_name, LoanStatus::Loaned)
    }
}
