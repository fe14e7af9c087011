//! User directory services.
//!
//! [`UserService`] implements the user driving ports: registration, rename,
//! deletion by name, listing and the per-user loan roll-up.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    BookHistoryResponse, LoanRepository, UserCommand, UserCreateRequest, UserLoanHistoryResponse,
    UserQuery, UserRepository, UserResponse, UserUpdateRequest,
};
use crate::domain::repository_error_mapping::{
    map_loan_repository_error, map_user_repository_error,
};
use crate::domain::{Error, LoanRecord, NewUser, User, UserId, UserName};

/// User directory service implementing the user driving ports.
#[derive(Clone)]
pub struct UserService<U, L> {
    user_repo: Arc<U>,
    loan_repo: Arc<L>,
}

impl<U, L> UserService<U, L> {
    /// Create a new service over the directory and ledger.
    pub fn new(user_repo: Arc<U>, loan_repo: Arc<L>) -> Self {
        Self {
            user_repo,
            loan_repo,
        }
    }
}

fn group_by_user(loans: Vec<LoanRecord>) -> HashMap<UserId, Vec<BookHistoryResponse>> {
    let mut grouped: HashMap<UserId, Vec<BookHistoryResponse>> = HashMap::new();
    for loan in loans {
        grouped
            .entry(loan.user_id())
            .or_default()
            .push(BookHistoryResponse {
                is_returned: loan.is_returned(),
                name: loan.book_name().clone(),
            });
    }
    grouped
}

#[async_trait]
impl<U, L> UserCommand for UserService<U, L>
where
    U: UserRepository,
    L: LoanRepository,
{
    async fn save_user(&self, request: UserCreateRequest) -> Result<User, Error> {
        let user = NewUser {
            name: request.name,
            age: request.age,
        };

        self.user_repo
            .insert(&user)
            .await
            .map_err(map_user_repository_error)
    }

    async fn update_user_name(&self, request: UserUpdateRequest) -> Result<User, Error> {
        let mut user = self
            .user_repo
            .find_by_id(request.id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {} not found", request.id)))?;

        user.rename(request.name);
        self.user_repo
            .update_name(&user)
            .await
            .map_err(map_user_repository_error)?;

        Ok(user)
    }

    async fn delete_user(&self, name: &UserName) -> Result<(), Error> {
        let user = self
            .user_repo
            .find_by_name(name)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {name} not found")))?;

        self.user_repo
            .delete(user.id())
            .await
            .map_err(map_user_repository_error)
    }
}

#[async_trait]
impl<U, L> UserQuery for UserService<U, L>
where
    U: UserRepository,
    L: LoanRepository,
{
    async fn users(&self) -> Result<Vec<UserResponse>, Error> {
        let users = self
            .user_repo
            .find_all()
            .await
            .map_err(map_user_repository_error)?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn user_loan_histories(&self) -> Result<Vec<UserLoanHistoryResponse>, Error> {
        let users = self
            .user_repo
            .find_all()
            .await
            .map_err(map_user_repository_error)?;
        let loans = self
            .loan_repo
            .find_all()
            .await
            .map_err(map_loan_repository_error)?;

        let mut grouped = group_by_user(loans);
        Ok(users
            .into_iter()
            .map(|user| UserLoanHistoryResponse {
                books: grouped.remove(&user.id()).unwrap_or_default(),
                name: user.name().clone(),
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
