/// Persistence traits
///
/// Services depend on [`UserStore`] and [`NoteStore`] trait objects that are
/// constructed once at startup and injected, never on a global handle.
///
/// # Implementations
///
/// - [`postgres::PgStore`]: production store over a `sqlx` pool
/// - [`memory::MemoryStore`]: process-local store for tests and local runs
///
/// Both evaluate the same [`NoteFilter`], so scoping behaves identically.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::filter::{NoteFilter, Pagination};
use crate::models::note::{CreateNote, Note, UpdateNote};
use crate::models::user::{CreateUser, User};

pub mod memory;
pub mod postgres;

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return StoreError::UniqueViolation(constraint);
            }
        }
        StoreError::Database(err)
    }
}

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user; fails with `UniqueViolation` on a taken email
    async fn insert_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Looks a user up by normalised email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Sets last-login to now, returning the stored value
    async fn record_login(&self, user_id: Uuid) -> StoreResult<Option<DateTime<Utc>>>;
}

/// Note store
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persists a new note
    async fn insert_note(&self, data: CreateNote) -> StoreResult<Note>;

    /// First note matching the filter
    async fn find_note(&self, filter: &NoteFilter) -> StoreResult<Option<Note>>;

    /// Matching notes in insertion order, sliced by the pagination
    async fn list_notes(&self, filter: &NoteFilter, page: Pagination) -> StoreResult<Vec<Note>>;

    /// Applies content changes to the matching note
    async fn update_note(
        &self,
        filter: &NoteFilter,
        changes: UpdateNote,
    ) -> StoreResult<Option<Note>>;

    /// Sets the soft-delete flag on the matching note
    async fn soft_delete_note(&self, filter: &NoteFilter) -> StoreResult<Option<Note>>;
}

/// A complete backend: both stores plus a liveness probe
#[async_trait]
pub trait Store: UserStore + NoteStore {
    /// Short backend name for health output
    fn backend(&self) -> &'static str;

    /// Checks the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_sqlx_error_is_wrapped() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }
}
