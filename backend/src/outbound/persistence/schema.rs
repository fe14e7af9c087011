//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Book catalogue.
    ///
    /// Titles are not unique. `book_type` stores the upper-case category name.
    books (id) {
        /// Primary key issued by a `BIGSERIAL` sequence.
        id -> Int8,
        /// Book title.
        name -> Text,
        /// Category, one of `COMPUTER`, `SCIENCE`, `SOCIAL`, `LANGUAGE`, `ART`
        /// or `UNSPECIFIED`.
        book_type -> Varchar,
    }
}

diesel::table! {
    /// Registered library users.
    users (id) {
        /// Primary key issued by a `BIGSERIAL` sequence.
        id -> Int8,
        /// Display name, non-blank.
        name -> Text,
        /// Optional age, never negative. Wide enough for any `u32`.
        age -> Nullable<Int8>,
    }
}

diesel::table! {
    /// Loan ledger.
    ///
    /// A partial unique index on `book_name` where `status = 'LOANED'` keeps at
    /// most one active loan per title. Rows are removed with their user.
    user_loan_histories (id) {
        /// Primary key issued by a `BIGSERIAL` sequence.
        id -> Int8,
        /// Borrowing user (FK to `users.id`, `ON DELETE CASCADE`).
        user_id -> Int8,
        /// Borrowed title.
        book_name -> Text,
        /// `LOANED` or `RETURNED`.
        status -> Varchar,
    }
}

diesel::joinable!(user_loan_histories -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(books, users, user_loan_histories);
