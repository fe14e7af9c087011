//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of the repository ports:
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: a process-local store used by tests and local tooling
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic
//! beyond the storage invariants the ports require of them.

pub mod memory;
pub mod persistence;
