//! # NoteVault Shared Library
//!
//! Domain types, persistence and business logic used by the NoteVault API
//! server.
//!
//! ## Module Organization
//!
//! - `models`: User and note records plus their SQL operations
//! - `filter`: Authorization-scoped note predicates and pagination
//! - `store`: Store traits with PostgreSQL and in-memory implementations
//! - `services`: Auth and note use-cases
//! - `auth`: Password hashing, JWT, identity middleware
//! - `db`: Connection pool and migrations
//! - `error`: Service error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod filter;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the NoteVault shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
