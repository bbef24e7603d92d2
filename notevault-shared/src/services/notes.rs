/// Caller-scoped note operations
///
/// Every read and write goes through [`build_filter`], so owners only ever
/// touch their own notes and admins touch any. A note that exists but is out
/// of the caller's reach is reported exactly like a missing one.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::middleware::AuthContext;
use crate::error::{ServiceError, ServiceResult};
use crate::filter::{build_filter, NoteAction, Pagination};
use crate::models::note::{CreateNote, Note, UpdateNote};
use crate::store::NoteStore;

/// Note creation input
#[derive(Debug, Clone)]
pub struct NewNote {
    /// Title
    pub title: String,

    /// Body text
    pub content: String,
}

/// Note use-cases over a [`NoteStore`]
#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteStore>,
}

impl NoteService {
    /// Creates the service
    pub fn new(notes: Arc<dyn NoteStore>) -> Self {
        Self { notes }
    }

    /// Creates a note owned by the caller
    pub async fn create(&self, caller: &AuthContext, data: NewNote) -> ServiceResult<Note> {
        let note = self
            .notes
            .insert_note(CreateNote {
                user_id: caller.user_id,
                title: data.title,
                content: data.content,
            })
            .await?;

        info!(user_id = %caller.user_id, note_id = %note.id, "Note created");
        Ok(note)
    }

    /// Lists visible notes in insertion order
    ///
    /// Zero matches is an empty page, never an error.
    pub async fn list(
        &self,
        caller: &AuthContext,
        search: Option<&str>,
        page: Pagination,
    ) -> ServiceResult<Vec<Note>> {
        let filter = build_filter(caller, NoteAction::List, None, search);
        let notes = self.notes.list_notes(&filter, page).await?;

        debug!(
            user_id = %caller.user_id,
            page = page.page(),
            limit = page.limit(),
            count = notes.len(),
            "Notes listed"
        );
        Ok(notes)
    }

    /// Fetches a single visible note
    pub async fn get(&self, caller: &AuthContext, id: Uuid) -> ServiceResult<Note> {
        let filter = build_filter(caller, NoteAction::Get, Some(id), None);
        self.notes
            .find_note(&filter)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Applies title/content changes to a visible note
    pub async fn update(
        &self,
        caller: &AuthContext,
        id: Uuid,
        changes: UpdateNote,
    ) -> ServiceResult<Note> {
        let filter = build_filter(caller, NoteAction::Update, Some(id), None);
        let note = self
            .notes
            .update_note(&filter, changes)
            .await?
            .ok_or(ServiceError::NotFound)?;

        info!(user_id = %caller.user_id, note_id = %note.id, "Note updated");
        Ok(note)
    }

    /// Soft-deletes a note
    ///
    /// Deleting an already deleted note succeeds again.
    pub async fn delete(&self, caller: &AuthContext, id: Uuid) -> ServiceResult<()> {
        let filter = build_filter(caller, NoteAction::Delete, Some(id), None);
        let note = self
            .notes
            .soft_delete_note(&filter)
            .await?
            .ok_or(ServiceError::NotFound)?;

        info!(user_id = %caller.user_id, note_id = %note.id, "Note deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use crate::store::memory::MemoryStore;

    fn service() -> NoteService {
        NoteService::new(Arc::new(MemoryStore::new()))
    }

    fn owner() -> AuthContext {
        AuthContext::new(Uuid::new_v4(), Role::Owner)
    }

    fn admin() -> AuthContext {
        AuthContext::new(Uuid::new_v4(), Role::Admin)
    }

    fn note(title: &str, content: &str) -> NewNote {
        NewNote {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_owner_sees_only_own_notes() {
        let notes = service();
        let alice = owner();
        let bob = owner();

        notes.create(&alice, note("alice 1", "")).await.unwrap();
        let bobs = notes.create(&bob, note("bob 1", "")).await.unwrap();
        notes.create(&alice, note("alice 2", "")).await.unwrap();

        let listed = notes
            .list(&alice, None, Pagination::default())
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|n| n.user_id == alice.user_id));

        let searched = notes
            .list(&alice, Some("bob"), Pagination::default())
            .await
            .unwrap();
        assert!(searched.is_empty());

        let err = notes.get(&alice, bobs.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound));
    }

    #[tokio::test]
    async fn test_owner_cannot_update_or_delete_foreign_note() {
        let notes = service();
        let alice = owner();
        let bob = owner();
        let bobs = notes.create(&bob, note("bob 1", "")).await.unwrap();

        let err = notes
            .update(
                &alice,
                bobs.id,
                UpdateNote {
                    title: Some("hijacked".to_string()),
                    content: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound));

        let err = notes.delete(&alice, bobs.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound));

        assert_eq!(notes.get(&bob, bobs.id).await.unwrap().title, "bob 1");
    }

    #[tokio::test]
    async fn test_admin_is_unrestricted_by_owner() {
        let notes = service();
        let alice = owner();
        let root = admin();

        let a = notes.create(&alice, note("alice 1", "")).await.unwrap();
        notes.create(&owner(), note("carol 1", "")).await.unwrap();

        let listed = notes.list(&root, None, Pagination::default()).await.unwrap();
        assert_eq!(listed.len(), 2);

        assert_eq!(notes.get(&root, a.id).await.unwrap().id, a.id);

        let updated = notes
            .update(
                &root,
                a.id,
                UpdateNote {
                    title: None,
                    content: Some("reviewed".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "alice 1");
        assert_eq!(updated.content, "reviewed");
        assert_eq!(updated.user_id, alice.user_id);

        notes.delete(&root, a.id).await.unwrap();
        assert!(matches!(
            notes.get(&alice, a.id).await.unwrap_err(),
            ServiceError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_soft_deleted_notes_hidden_but_redeletable() {
        let notes = service();
        let alice = owner();
        let root = admin();
        let gone = notes.create(&alice, note("gone", "")).await.unwrap();
        notes.create(&alice, note("kept", "")).await.unwrap();

        notes.delete(&alice, gone.id).await.unwrap();
        notes.delete(&alice, gone.id).await.unwrap();

        for caller in [&alice, &root] {
            let listed = notes.list(caller, None, Pagination::default()).await.unwrap();
            let titles: Vec<_> = listed.iter().map(|n| n.title.as_str()).collect();
            assert_eq!(titles, vec!["kept"]);

            assert!(matches!(
                notes.get(caller, gone.id).await.unwrap_err(),
                ServiceError::NotFound
            ));
            assert!(matches!(
                notes
                    .update(caller, gone.id, UpdateNote::default())
                    .await
                    .unwrap_err(),
                ServiceError::NotFound
            ));
        }
    }

    #[tokio::test]
    async fn test_pagination_returns_items_six_to_ten() {
        let notes = service();
        let alice = owner();
        for i in 1..=12 {
            notes
                .create(&alice, note(&format!("note {}", i), ""))
                .await
                .unwrap();
        }

        let page = notes
            .list(&alice, None, Pagination::new(2, 5))
            .await
            .unwrap();
        let titles: Vec<_> = page.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["note 6", "note 7", "note 8", "note 9", "note 10"]);

        let empty = notes
            .list(&alice, None, Pagination::new(4, 5))
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_page_number_is_empty() {
        let notes = service();
        let alice = owner();
        for i in 0..3 {
            notes
                .create(&alice, note(&format!("n{}", i), ""))
                .await
                .unwrap();
        }

        let listed = notes
            .list(&alice, None, Pagination::from_query(Some("5000000000"), None))
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_over_title_or_content() {
        let notes = service();
        let alice = owner();
        notes
            .create(&alice, note("Meeting Notes", "agenda"))
            .await
            .unwrap();
        notes
            .create(&alice, note("Groceries", "after the MEETING"))
            .await
            .unwrap();
        notes.create(&alice, note("Ideas", "none")).await.unwrap();

        let found = notes
            .list(&alice, Some("meeting"), Pagination::default())
            .await
            .unwrap();
        let titles: Vec<_> = found.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Meeting Notes", "Groceries"]);
    }

    #[tokio::test]
    async fn test_missing_note_is_not_found() {
        let notes = service();
        let err = notes.get(&owner(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound));

        let err = notes.delete(&admin(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound));
    }
}
