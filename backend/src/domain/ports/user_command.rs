//! Driving port for user directory mutations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, User, UserId, UserName};

/// Request to register a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateRequest {
    /// Name of the new user.
    pub name: UserName,
    /// Optional age.
    #[serde(default)]
    pub age: Option<u32>,
}

/// Request to rename a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    /// User being renamed.
    pub id: UserId,
    /// Replacement name.
    pub name: UserName,
}

/// Driving port for creating, renaming and deleting users.
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Register a user.
    ///
    /// # Errors
    ///
    /// Returns a service-unavailable or internal error when persistence fails.
    async fn save_user(&self, request: UserCreateRequest) -> Result<User, Error>;

    /// Rename a user.
    ///
    /// # Errors
    ///
    /// Not found when no user has the id; the store is left unchanged.
    async fn update_user_name(&self, request: UserUpdateRequest) -> Result<User, Error>;

    /// Delete the user with the given name along with their loan history.
    ///
    /// # Errors
    ///
    /// Not found when no user has the name; the store is left unchanged.
    async fn delete_user(&self, name: &UserName) -> Result<(), Error>;
}
