//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The user name was empty once trimmed.
    EmptyName,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "user name must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Store-generated user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier issued by a repository.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name a user is known by.
///
/// Names are looked up verbatim by the loan workflow, so surrounding
/// whitespace is kept; only blank names are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyName`] for blank input.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Library member.
///
/// ## Invariants
/// - `name` is non-blank.
/// - `age`, when present, is non-negative by construction.
///
/// Loans are not held here; they reference the user by [`UserId`] and are
/// fetched through the loan repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: UserName,
    age: Option<u32>,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(id: UserId, name: UserName, age: Option<u32>) -> Self {
        Self { id, name, age }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Current name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Age, if the user supplied one.
    pub fn age(&self) -> Option<u32> {
        self.age
    }

    /// Replace the user's name.
    pub fn rename(&mut self, name: UserName) {
        self.name = name;
    }
}

/// User data awaiting an identifier from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Name to store.
    pub name: UserName,
    /// Optional age.
    pub age: Option<u32>,
}

impl NewUser {
    /// Attach a store-issued identifier.
    pub fn with_id(self, id: UserId) -> User {
        User::new(id, self.name, self.age)
    }
}
