//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use diesel::prelude::*;

use super::schema::{books, user_loan_histories, users};

// ---------------------------------------------------------------------------
// Book models
// ---------------------------------------------------------------------------

/// Row struct for reading from the books table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookRow {
    pub id: i64,
    pub name: String,
    pub book_type: String,
}

/// Insertable struct for creating new catalogue entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = books)]
pub(crate) struct NewBookRow<'a> {
    pub name: &'a str,
    pub book_type: &'a str,
}

// ---------------------------------------------------------------------------
// User models
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub age: Option<i64>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub age: Option<i64>,
}

/// Changeset struct for renaming existing user records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserNameUpdate<'a> {
    pub name: &'a str,
}

// ---------------------------------------------------------------------------
// Loan ledger models
// ---------------------------------------------------------------------------

/// Row struct for reading from the user_loan_histories table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_loan_histories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoanRow {
    pub id: i64,
    pub user_id: i64,
    pub book_name: String,
    pub status: String,
}

/// Insertable struct for recording a loan.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_loan_histories)]
pub(crate) struct NewLoanRow<'a> {
    pub user_id: i64,
    pub book_name: &'a str,
    pub status: &'a str,
}
