//! PostgreSQL-backed `LoanRepository` implementation using Diesel ORM.
//!
//! The ledger relies on the `user_loan_histories_active_book_idx` partial
//! unique index to reject a second active loan for a title, and flips status
//! with a conditional update so a loan can only be returned once.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{LoanRepository, LoanRepositoryError};
use crate::domain::{BookName, LoanId, LoanRecord, LoanStatus, NewLoan, UserId};

use super::diesel_basic_error_mapping::{
    is_active_loan_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{LoanRow, NewLoanRow};
use super::pool::{DbPool, PoolError};
use super::schema::user_loan_histories;

/// Diesel-backed implementation of the `LoanRepository` port.
#[derive(Clone)]
pub struct DieselLoanRepository {
    pool: DbPool,
}

impl DieselLoanRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LoanRepositoryError {
    map_basic_pool_error(error, LoanRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LoanRepositoryError {
    map_basic_diesel_error(
        error,
        LoanRepositoryError::query,
        LoanRepositoryError::connection,
    )
}

fn map_insert_error(error: diesel::result::Error, book_name: &BookName) -> LoanRepositoryError {
    if is_active_loan_violation(&error) {
        debug!(book_name = %book_name, "active loan index rejected insert");
        return LoanRepositoryError::already_loaned(book_name.clone());
    }
    map_diesel_error(error)
}

fn parse_status(value: &str, loan_id: i64) -> LoanStatus {
    value.parse().unwrap_or_else(|_| {
        warn!(
            value,
            loan_id, "unrecognised loan status value, treating as RETURNED"
        );
        LoanStatus::Returned
    })
}

/// Convert a database row to a domain LoanRecord.
fn row_to_loan(row: LoanRow) -> Result<LoanRecord, LoanRepositoryError> {
    let status = parse_status(&row.status, row.id);
    let book_name = BookName::new(row.book_name)
        .map_err(|err| LoanRepositoryError::query(format!("loan {}: {err}", row.id)))?;
    Ok(LoanRecord::new(
        LoanId::new(row.id),
        UserId::new(row.user_id),
        book_name,
        status,
    ))
}

#[async_trait]
impl LoanRepository for DieselLoanRepository {
    async fn insert(&self, loan: &NewLoan) -> Result<LoanRecord, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewLoanRow {
            user_id: loan.user_id.as_i64(),
            book_name: loan.book_name.as_ref(),
            status: LoanStatus::Loaned.as_str(),
        };

        let row = diesel::insert_into(user_loan_histories::table)
            .values(&new_row)
            .returning(LoanRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, &loan.book_name))?;

        row_to_loan(row)
    }

    async fn find_active_by_book_name(
        &self,
        book_name: &BookName,
    ) -> Result<Option<LoanRecord>, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<LoanRow> = user_loan_histories::table
            .filter(user_loan_histories::book_name.eq(book_name.as_ref()))
            .filter(user_loan_histories::status.eq(LoanStatus::Loaned.as_str()))
            .select(LoanRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_loan).transpose()
    }

    async fn mark_returned(&self, id: LoanId) -> Result<(), LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated_rows = diesel::update(
            user_loan_histories::table
                .find(id.as_i64())
                .filter(user_loan_histories::status.eq(LoanStatus::Loaned.as_str())),
        )
        .set(user_loan_histories::status.eq(LoanStatus::Returned.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if updated_rows == 0 {
            return Err(LoanRepositoryError::not_active(id));
        }
        Ok(())
    }

    async fn count_by_status(&self, status: LoanStatus) -> Result<u64, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = user_loan_histories::table
            .filter(user_loan_histories::status.eq(status.as_str()))
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        u64::try_from(count).map_err(|_| LoanRepositoryError::query("negative loan count"))
    }

    async fn find_all(&self) -> Result<Vec<LoanRecord>, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LoanRow> = user_loan_histories::table
            .order(user_loan_histories::id.asc())
            .select(LoanRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_loan).collect()
    }
}
