//! Book catalogue model and category parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Validation errors returned by the book value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookValidationError {
    /// The title was empty once trimmed.
    #[error("book name must not be empty")]
    EmptyName,
}

/// Closed set of catalogue categories used for statistics.
///
/// Declaration order is the order statistics are reported in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookType {
    /// Computing and programming.
    Computer,
    /// Natural sciences.
    Science,
    /// Social sciences.
    Social,
    /// Languages and linguistics.
    Language,
    /// Art and design.
    Art,
    /// No category supplied.
    #[default]
    Unspecified,
}

impl BookType {
    /// Every category in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Computer,
        Self::Science,
        Self::Social,
        Self::Language,
        Self::Art,
        Self::Unspecified,
    ];

    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Computer => "COMPUTER",
            Self::Science => "SCIENCE",
            Self::Social => "SOCIAL",
            Self::Language => "LANGUAGE",
            Self::Art => "ART",
            Self::Unspecified => "UNSPECIFIED",
        }
    }
}

impl fmt::Display for BookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`BookType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBookTypeError {
    /// Rejected input.
    pub input: String,
}

impl fmt::Display for ParseBookTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid book type: {}", self.input)
    }
}

impl std::error::Error for ParseBookTypeError {}

impl FromStr for BookType {
    type Err = ParseBookTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| ParseBookTypeError {
                input: value.to_owned(),
            })
    }
}

/// Store-generated book identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(i64);

impl BookId {
    /// Wrap a raw identifier issued by a repository.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

/// Book title. Loans reference books by this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookName(String);

impl BookName {
    /// Validate and construct a [`BookName`].
    ///
    /// # Errors
    ///
    /// Returns [`BookValidationError::EmptyName`] for blank input.
    pub fn new(name: impl Into<String>) -> Result<Self, BookValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BookValidationError::EmptyName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for BookName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<BookName> for String {
    fn from(value: BookName) -> Self {
        value.0
    }
}

impl TryFrom<String> for BookName {
    type Error = BookValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Catalogue entry. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    id: BookId,
    name: BookName,
    #[serde(rename = "type")]
    book_type: BookType,
}

impl Book {
    /// Build a [`Book`] from validated components.
    pub fn new(id: BookId, name: BookName, book_type: BookType) -> Self {
        Self {
            id,
            name,
            book_type,
        }
    }

    /// Stable book identifier.
    pub fn id(&self) -> BookId {
        self.id
    }

    /// Title.
    pub fn name(&self) -> &BookName {
        &self.name
    }

    /// Category.
    pub fn book_type(&self) -> BookType {
        self.book_type
    }
}

/// Book data awaiting an identifier from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    /// Title to store.
    pub name: BookName,
    /// Category to store.
    pub book_type: BookType,
}

impl NewBook {
    /// Attach a store-issued identifier.
    pub fn with_id(self, id: BookId) -> Book {
        Book::new(id, self.name, self.book_type)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for book values and category parsing.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn every_category_round_trips_through_its_stored_form() {
        for kind in BookType::ALL {
            assert_eq!(kind.as_str().parse::<BookType>(), Ok(kind));
        }
    }

    #[rstest]
    #[case("computer")]
    #[case("ECONOMY")]
    #[case("")]
    fn unknown_categories_fail_to_parse(#[case] raw: &str) {
        let error = raw.parse::<BookType>().expect_err("unknown category");
        assert_eq!(error.input, raw);
    }

    #[rstest]
    fn missing_category_defaults_to_unspecified() {
        assert_eq!(BookType::default(), BookType::Unspecified);
    }

    #[rstest]
    fn serde_uses_screaming_case() {
        let value = serde_json::to_value(BookType::Computer).expect("serialises");
        assert_eq!(value, serde_json::json!("COMPUTER"));
    }

    #[rstest]
    fn blank_titles_are_rejected() {
        assert_eq!(BookName::new(" "), Err(BookValidationError::EmptyName));
    }

    #[rstest]
    fn book_serialises_category_as_type() {
        let book = NewBook {
            name: BookName::new("TEST BOOK").expect("name"),
            book_type: BookType::Science,
        }
        .with_id(BookId::new(4));
        let value = serde_json::to_value(&book).expect("serialises");
        assert_eq!(
            value,
            serde_json::json!({"id": 4, "name": "TEST BOOK", "type": "SCIENCE"})
        );
    }
}
