/// In-memory store
///
/// Keeps users and notes in insertion-ordered vectors behind a
/// `tokio::sync::RwLock`. Notes are matched with [`NoteFilter::matches`], the
/// same predicate the PostgreSQL store renders into SQL. Data lives only as
/// long as the process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NoteStore, Store, StoreError, StoreResult, UserStore};
use crate::filter::{NoteFilter, Pagination};
use crate::models::note::{CreateNote, Note, UpdateNote};
use crate::models::user::{CreateUser, User};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    notes: Vec<Note>,
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time, forced strictly after `previous`
    ///
    /// Keeps timestamps monotonic on coarse clocks.
    fn tick(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
        let now = Utc::now();
        match previous {
            Some(prev) if now <= prev => prev + chrono::Duration::microseconds(1),
            _ => now,
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            last_login_at: None,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn record_login(&self, user_id: Uuid) -> StoreResult<Option<DateTime<Utc>>> {
        let mut tables = self.tables.write().await;

        Ok(tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .map(|user| {
                let stamped = Self::tick(user.last_login_at);
                user.last_login_at = Some(stamped);
                stamped
            }))
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn insert_note(&self, data: CreateNote) -> StoreResult<Note> {
        let mut tables = self.tables.write().await;

        let created_at = Self::tick(tables.notes.last().map(|n| n.created_at));
        let note = Note {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            title: data.title,
            content: data.content,
            is_deleted: false,
            created_at,
            updated_at: created_at,
        };
        tables.notes.push(note.clone());

        Ok(note)
    }

    async fn find_note(&self, filter: &NoteFilter) -> StoreResult<Option<Note>> {
        let tables = self.tables.read().await;
        Ok(tables.notes.iter().find(|n| filter.matches(n)).cloned())
    }

    async fn list_notes(&self, filter: &NoteFilter, page: Pagination) -> StoreResult<Vec<Note>> {
        let tables = self.tables.read().await;
        let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.take()).unwrap_or(usize::MAX);

        Ok(tables
            .notes
            .iter()
            .filter(|n| filter.matches(n))
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn update_note(
        &self,
        filter: &NoteFilter,
        changes: UpdateNote,
    ) -> StoreResult<Option<Note>> {
        let mut tables = self.tables.write().await;

        Ok(tables
            .notes
            .iter_mut()
            .find(|n| filter.matches(n))
            .map(|note| {
                changes.apply_to(note);
                note.updated_at = Self::tick(Some(note.updated_at));
                note.clone()
            }))
    }

    async fn soft_delete_note(&self, filter: &NoteFilter) -> StoreResult<Option<Note>> {
        let mut tables = self.tables.write().await;

        Ok(tables
            .notes
            .iter_mut()
            .find(|n| filter.matches(n))
            .map(|note| {
                note.is_deleted = true;
                note.updated_at = Self::tick(Some(note.updated_at));
                note.clone()
            }))
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::NoteClause;
    use crate::models::user::Role;

    fn new_user(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Owner,
        }
    }

    fn new_note(user_id: Uuid, title: &str) -> CreateNote {
        CreateNote {
            user_id,
            title: title.to_string(),
            content: String::new(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let store = MemoryStore::new();
        store.insert_user(new_user("a@example.com")).await.unwrap();

        let err = store.insert_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn test_record_login_is_strictly_increasing() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("a@example.com")).await.unwrap();

        let first = store.record_login(user.id).await.unwrap().unwrap();
        let second = store.record_login(user.id).await.unwrap().unwrap();
        assert!(second > first);

        assert_eq!(store.record_login(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order_and_slices() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        for i in 1..=7 {
            store.insert_note(new_note(owner, &format!("note {}", i))).await.unwrap();
        }

        let page = store
            .list_notes(&NoteFilter::new(), Pagination::new(2, 3))
            .await
            .unwrap();
        let titles: Vec<_> = page.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["note 4", "note 5", "note 6"]);

        let beyond = store
            .list_notes(&NoteFilter::new(), Pagination::new(9, 3))
            .await
            .unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_soft_delete_respect_filter() {
        let store = MemoryStore::new();
        let note = store.insert_note(new_note(Uuid::new_v4(), "draft")).await.unwrap();

        let miss = NoteFilter::new().and(NoteClause::IdEquals(Uuid::new_v4()));
        assert!(store.soft_delete_note(&miss).await.unwrap().is_none());

        let hit = NoteFilter::new().and(NoteClause::IdEquals(note.id));
        let updated = store
            .update_note(
                &hit,
                UpdateNote {
                    title: Some("final".to_string()),
                    content: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "final");
        assert!(updated.updated_at > note.updated_at);

        let deleted = store.soft_delete_note(&hit).await.unwrap().unwrap();
        assert!(deleted.is_deleted);
        assert_eq!(deleted.user_id, note.user_id);
    }
}
