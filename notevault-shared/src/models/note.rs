/// Note model and database operations
///
/// Notes belong to exactly one user and are never physically removed:
/// deleting a note flips `is_deleted`. Every query except `create` takes a
/// [`NoteFilter`] and renders it into a parameterised `WHERE` clause.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notes (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id),
///     title TEXT NOT NULL,
///     content TEXT NOT NULL DEFAULT '',
///     is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use notevault_shared::auth::middleware::AuthContext;
/// use notevault_shared::filter::{build_filter, NoteAction, Pagination};
/// use notevault_shared::models::note::{CreateNote, Note};
/// use notevault_shared::models::user::Role;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// Note::create(&pool, CreateNote {
///     user_id,
///     title: "Meeting Notes".to_string(),
///     content: "Agenda".to_string(),
/// }).await?;
///
/// let caller = AuthContext::new(user_id, Role::Owner);
/// let filter = build_filter(&caller, NoteAction::List, None, Some("meeting"));
/// let notes = Note::find_page(&pool, &filter, Pagination::default()).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::filter::{NoteClause, NoteFilter, Pagination};

const NOTE_COLUMNS: &str = "id, user_id, title, content, is_deleted, created_at, updated_at";

/// Note record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique note ID
    pub id: Uuid,

    /// Owning user, fixed at creation
    pub user_id: Uuid,

    /// Title
    pub title: String,

    /// Body text
    pub content: String,

    /// Soft-delete flag
    pub is_deleted: bool,

    /// Insertion time, also the listing order
    pub created_at: DateTime<Utc>,

    /// Last content change or deletion
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a note
#[derive(Debug, Clone)]
pub struct CreateNote {
    /// Owner of the new note
    pub user_id: Uuid,

    /// Title
    pub title: String,

    /// Body text
    pub content: String,
}

/// Content changes for an existing note
///
/// Only non-None fields are written. The owner is deliberately not part of
/// this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateNote {
    /// New title
    pub title: Option<String>,

    /// New body text
    pub content: Option<String>,
}

impl UpdateNote {
    /// Applies the changes to an in-memory note
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
    }
}

impl Note {
    /// Inserts a note owned by `data.user_id`
    pub async fn create(pool: &PgPool, data: CreateNote) -> Result<Self, sqlx::Error> {
        let sql = format!(
            "INSERT INTO notes (user_id, title, content) VALUES ($1, $2, $3) RETURNING {}",
            NOTE_COLUMNS
        );

        sqlx::query_as::<_, Note>(&sql)
            .bind(data.user_id)
            .bind(data.title)
            .bind(data.content)
            .fetch_one(pool)
            .await
    }

    /// Returns the first note matching the filter
    pub async fn find_one(pool: &PgPool, filter: &NoteFilter) -> Result<Option<Self>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM notes", NOTE_COLUMNS));
        push_where(&mut query, filter);
        query.push(" ORDER BY created_at ASC, id ASC LIMIT 1");

        query.build_query_as::<Note>().fetch_optional(pool).await
    }

    /// Returns one page of matching notes in insertion order
    pub async fn find_page(
        pool: &PgPool,
        filter: &NoteFilter,
        page: Pagination,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM notes", NOTE_COLUMNS));
        push_where(&mut query, filter);
        query
            .push(" ORDER BY created_at ASC, id ASC LIMIT ")
            .push_bind(to_sql_count(page.take()))
            .push(" OFFSET ")
            .push_bind(to_sql_count(page.skip()));

        query.build_query_as::<Note>().fetch_all(pool).await
    }

    /// Applies content changes to the note matching the filter
    ///
    /// # Returns
    ///
    /// The updated note, or None if nothing matched
    pub async fn update_matching(
        pool: &PgPool,
        filter: &NoteFilter,
        changes: UpdateNote,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE notes SET updated_at = clock_timestamp()");
        if let Some(title) = changes.title {
            query.push(", title = ").push_bind(title);
        }
        if let Some(content) = changes.content {
            query.push(", content = ").push_bind(content);
        }
        push_where(&mut query, filter);
        query.push(" RETURNING ").push(NOTE_COLUMNS);

        query.build_query_as::<Note>().fetch_optional(pool).await
    }

    /// Flags the note matching the filter as deleted
    ///
    /// # Returns
    ///
    /// The flagged note, or None if nothing matched
    pub async fn soft_delete_matching(
        pool: &PgPool,
        filter: &NoteFilter,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new(
            "UPDATE notes SET is_deleted = TRUE, updated_at = clock_timestamp()",
        );
        push_where(&mut query, filter);
        query.push(" RETURNING ").push(NOTE_COLUMNS);

        query.build_query_as::<Note>().fetch_optional(pool).await
    }
}

/// Renders a filter as ` WHERE ...` with every value bound
///
/// Update and delete filters always carry an `IdEquals` clause, so at most
/// one row is touched by a write.
fn push_where(query: &mut QueryBuilder<'_, Postgres>, filter: &NoteFilter) {
    query.push(" WHERE TRUE");

    for clause in filter.clauses() {
        match clause {
            NoteClause::OwnerEquals(owner) => {
                query.push(" AND user_id = ").push_bind(*owner);
            }
            NoteClause::IdEquals(id) => {
                query.push(" AND id = ").push_bind(*id);
            }
            NoteClause::DeletedEquals(flag) => {
                query.push(" AND is_deleted = ").push_bind(*flag);
            }
            NoteClause::TextSearch(term) => {
                let pattern = like_pattern(term);
                query
                    .push(" AND (title ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR content ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
        }
    }
}

/// Builds a `%term%` ILIKE pattern matching the term literally
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn to_sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Note {
        let now = Utc::now();
        Note {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Meeting Notes".to_string(),
            content: "Agenda".to_string(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("meeting"), "%meeting%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_push_where_binds_all_values() {
        let owner = Uuid::new_v4();
        let id = Uuid::new_v4();
        let filter = NoteFilter::new()
            .and(NoteClause::IdEquals(id))
            .and(NoteClause::DeletedEquals(false))
            .and(NoteClause::OwnerEquals(owner))
            .and(NoteClause::TextSearch("x".to_string()));

        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM notes");
        push_where(&mut query, &filter);

        assert_eq!(
            query.sql(),
            "SELECT * FROM notes WHERE TRUE AND id = $1 AND is_deleted = $2 \
             AND user_id = $3 AND (title ILIKE $4 OR content ILIKE $5)"
        );
    }

    #[test]
    fn test_empty_filter_renders_match_all() {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM notes");
        push_where(&mut query, &NoteFilter::new());
        assert_eq!(query.sql(), "SELECT * FROM notes WHERE TRUE");
    }

    #[test]
    fn test_update_note_apply_to() {
        let mut note = sample();
        let owner = note.user_id;

        UpdateNote {
            title: None,
            content: Some("New body".to_string()),
        }
        .apply_to(&mut note);

        assert_eq!(note.title, "Meeting Notes");
        assert_eq!(note.content, "New body");
        assert_eq!(note.user_id, owner);
    }

    #[test]
    fn test_note_serialises_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("isDeleted").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_to_sql_count_saturates() {
        assert_eq!(to_sql_count(5), 5);
        assert_eq!(to_sql_count(u64::MAX), i64::MAX);
    }
}
