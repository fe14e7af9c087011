//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId, UserName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The targeted user row does not exist.
        NotFound { id: UserId } => "user {id} not found",
    }
}

/// Port for user directory storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return it with its store-issued identifier.
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError>;

    /// Fetch every user ordered by identifier.
    async fn find_all(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the first user (lowest identifier) with the given name.
    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserRepositoryError>;

    /// Overwrite the stored name of `user`.
    ///
    /// Returns [`UserRepositoryError::NotFound`] when no row matches the id.
    async fn update_name(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Delete a user together with every loan record that references it.
    ///
    /// Returns [`UserRepositoryError::NotFound`] when no row matches the id.
    async fn delete(&self, id: UserId) -> Result<(), UserRepositoryError>;
}
