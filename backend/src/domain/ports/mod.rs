//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; driving
//! ports (`*Command`, `*Query`) are implemented by the domain services and
//! consumed by whatever fronts the library.

mod macros;
pub(crate) use macros::define_port_error;

mod book_command;
mod book_query;
mod book_repository;
mod loan_repository;
mod user_command;
mod user_query;
mod user_repository;

pub use book_command::{BookCommand, BookLoanRequest, BookRequest, BookReturnRequest};
pub use book_query::{BookQuery, BookStatResponse};
#[cfg(test)]
pub use book_repository::MockBookRepository;
pub use book_repository::{BookRepository, BookRepositoryError, BookTypeCount};
#[cfg(test)]
pub use loan_repository::MockLoanRepository;
pub use loan_repository::{LoanRepository, LoanRepositoryError};
pub use user_command::{UserCommand, UserCreateRequest, UserUpdateRequest};
pub use user_query::{BookHistoryResponse, UserLoanHistoryResponse, UserQuery, UserResponse};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
