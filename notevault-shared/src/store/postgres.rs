/// PostgreSQL store
///
/// Thin adapter from the store traits onto the model functions; every
/// operation is one SQL statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{NoteStore, Store, StoreResult, UserStore};
use crate::db::pool;
use crate::filter::{NoteFilter, Pagination};
use crate::models::note::{CreateNote, Note, UpdateNote};
use crate::models::user::{CreateUser, User};

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn record_login(&self, user_id: Uuid) -> StoreResult<Option<DateTime<Utc>>> {
        Ok(User::update_last_login(&self.pool, user_id).await?)
    }
}

#[async_trait]
impl NoteStore for PgStore {
    async fn insert_note(&self, data: CreateNote) -> StoreResult<Note> {
        Ok(Note::create(&self.pool, data).await?)
    }

    async fn find_note(&self, filter: &NoteFilter) -> StoreResult<Option<Note>> {
        Ok(Note::find_one(&self.pool, filter).await?)
    }

    async fn list_notes(&self, filter: &NoteFilter, page: Pagination) -> StoreResult<Vec<Note>> {
        Ok(Note::find_page(&self.pool, filter, page).await?)
    }

    async fn update_note(
        &self,
        filter: &NoteFilter,
        changes: UpdateNote,
    ) -> StoreResult<Option<Note>> {
        Ok(Note::update_matching(&self.pool, filter, changes).await?)
    }

    async fn soft_delete_note(&self, filter: &NoteFilter) -> StoreResult<Option<Note>> {
        Ok(Note::soft_delete_matching(&self.pool, filter).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(pool::health_check(&self.pool).await?)
    }
}
