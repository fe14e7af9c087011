//! PostgreSQL-backed `BookRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{BookRepository, BookRepositoryError, BookTypeCount};
use crate::domain::{Book, BookId, BookName, BookType, NewBook};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BookRow, NewBookRow};
use super::pool::{DbPool, PoolError};
use super::schema::books;

/// Diesel-backed implementation of the `BookRepository` port.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookRepositoryError {
    map_basic_pool_error(error, BookRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BookRepositoryError {
    map_basic_diesel_error(
        error,
        BookRepositoryError::query,
        BookRepositoryError::connection,
    )
}

fn parse_book_type(value: &str, book_id: i64) -> BookType {
    value.parse().unwrap_or_else(|_| {
        warn!(
            value,
            book_id, "unrecognised book_type value, defaulting to UNSPECIFIED"
        );
        BookType::Unspecified
    })
}

/// Convert a database row to a domain Book.
fn row_to_book(row: BookRow) -> Result<Book, BookRepositoryError> {
    let book_type = parse_book_type(&row.book_type, row.id);
    let name = BookName::new(row.name)
        .map_err(|err| BookRepositoryError::query(format!("book {}: {err}", row.id)))?;
    Ok(Book::new(BookId::new(row.id), name, book_type))
}

fn count_to_entry(book_type: &str, count: i64) -> Result<BookTypeCount, BookRepositoryError> {
    let count = u64::try_from(count)
        .map_err(|_| BookRepositoryError::query("negative category count"))?;
    let book_type = book_type.parse().unwrap_or_else(|_| {
        warn!(
            value = book_type,
            "unrecognised book_type value in aggregate, counting as UNSPECIFIED"
        );
        BookType::Unspecified
    });
    Ok(BookTypeCount { book_type, count })
}

/// Fold counts that resolve to the same category.
fn merge_counts(entries: Vec<BookTypeCount>) -> Vec<BookTypeCount> {
    let mut merged: Vec<BookTypeCount> = Vec::with_capacity(entries.len());
    for entry in entries {
        match merged
            .iter_mut()
            .find(|existing| existing.book_type == entry.book_type)
        {
            Some(existing) => existing.count += entry.count,
            None => merged.push(entry),
        }
    }
    merged
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn insert(&self, book: &NewBook) -> Result<Book, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewBookRow {
            name: book.name.as_ref(),
            book_type: book.book_type.as_str(),
        };

        let row = diesel::insert_into(books::table)
            .values(&new_row)
            .returning(BookRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_book(row)
    }

    async fn find_by_name(&self, name: &BookName) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<BookRow> = books::table
            .filter(books::name.eq(name.as_ref()))
            .order(books::id.asc())
            .select(BookRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_book).transpose()
    }

    async fn count_by_type(&self) -> Result<Vec<BookTypeCount>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(String, i64)> = books::table
            .group_by(books::book_type)
            .select((books::book_type, count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let entries = rows
            .iter()
            .map(|(book_type, count)| count_to_entry(book_type, *count))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(merge_counts(entries))
    }
}
