//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Users are keyed by a `BIGSERIAL` identifier. Deleting a user removes their
//! loan history in the same transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::{debug, warn};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{NewUser, User, UserId, UserName};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserNameUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{user_loan_histories, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

fn age_for_db(age: Option<u32>) -> Option<i64> {
    age.map(i64::from)
}

/// Convert a database row to a domain User.
fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let age = row.age.and_then(|age| {
        u32::try_from(age)
            .inspect_err(|_| {
                warn!(age, user_id = row.id, "stored age out of range, treating as absent");
            })
            .ok()
    });
    let name = UserName::new(row.name)
        .map_err(|err| UserRepositoryError::query(format!("user {}: {err}", row.id)))?;
    Ok(User::new(UserId::new(row.id), name, age))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let new_row = NewUserRow {
            name: user.name.as_ref(),
            age: age_for_db(user.age),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn find_all(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.as_i64())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::name.eq(name.as_ref()))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn update_name(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let update = UserNameUpdate {
            name: user.name().as_ref(),
        };
        let updated_rows = diesel::update(users::table.find(user.id().as_i64()))
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated_rows == 0 {
            return Err(UserRepositoryError::not_found(user.id()));
        }
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = id.as_i64();

        let (dropped_loans, deleted_users) = conn
            .transaction(|conn| {
                async move {
                    let dropped_loans = diesel::delete(
                        user_loan_histories::table
                            .filter(user_loan_histories::user_id.eq(user_id)),
                    )
                    .execute(conn)
                    .await?;
                    let deleted_users = diesel::delete(users::table.find(user_id))
                        .execute(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((dropped_loans, deleted_users))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if deleted_users == 0 {
            return Err(UserRepositoryError::not_found(id));
        }
        debug!(user_id, dropped_loans, "deleted user and loan history");
        Ok(())
    }
}
