//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so the
//! embedded PostgreSQL bootstrap lives here and each Diesel suite pulls it in
//! with `mod support;`.

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{PgDatabase, provision_database};
