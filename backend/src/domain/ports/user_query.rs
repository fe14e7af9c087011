//! Driving port for user directory reads and loan roll-ups.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{BookName, Error, User, UserId, UserName};

/// User as listed by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Identifier.
    pub id: UserId,
    /// Name.
    pub name: UserName,
    /// Age, `null` when not supplied.
    pub age: Option<u32>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id(),
            age: user.age(),
            name: user.name().clone(),
        }
    }
}

/// One loan in a user's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookHistoryResponse {
    /// Borrowed title.
    pub name: BookName,
    /// Whether the book has come back.
    pub is_returned: bool,
}

/// A user's complete loan history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLoanHistoryResponse {
    /// User name.
    pub name: UserName,
    /// Every loan the user ever made, oldest first. Empty, never absent, for
    /// users without loans.
    pub books: Vec<BookHistoryResponse>,
}

/// Driving port for read-only user queries.
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// List every user.
    ///
    /// # Errors
    ///
    /// Returns a service-unavailable or internal error when persistence fails.
    async fn users(&self) -> Result<Vec<UserResponse>, Error>;

    /// Loan history for every user, including users with no loans.
    ///
    /// # Errors
    ///
    /// Returns a service-unavailable or internal error when persistence fails.
    async fn user_loan_histories(&self) -> Result<Vec<UserLoanHistoryResponse>, Error>;
}
