//! Library lending backend.
//!
//! The crate keeps a book catalogue, a user directory and a loan ledger behind
//! domain ports. [`domain`] holds the entities and services, [`outbound`] the
//! PostgreSQL and in-memory adapters, and [`config`] the layered settings used
//! by the `library-admin` binary.

pub mod config;
pub mod domain;
pub mod outbound;
