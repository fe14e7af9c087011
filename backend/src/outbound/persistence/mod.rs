//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the library repository
//! ports backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. Storage invariants (one active loan per
//!   title, cascading loan removal) live in the schema.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Strongly typed errors**: All database errors are mapped to the port
//!   error types.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use library_backend::domain::BookService;
//! use library_backend::outbound::persistence::{
//!     DbPool, DieselBookRepository, DieselLoanRepository, DieselUserRepository, PoolConfig,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/library")).await?;
//! let service = BookService::new(
//!     Arc::new(DieselBookRepository::new(pool.clone())),
//!     Arc::new(DieselUserRepository::new(pool.clone())),
//!     Arc::new(DieselLoanRepository::new(pool)),
//! );
//! # let _ = service;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_book_repository;
mod diesel_loan_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_book_repository::DieselBookRepository;
pub use diesel_loan_repository::DieselLoanRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
