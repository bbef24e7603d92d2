/// Note endpoints
///
/// All routes require a bearer token. Notes outside the caller's reach are
/// reported as 404, never 403.
///
/// # Endpoints
///
/// - `POST /notes` - Create a note
/// - `GET /notes?search=&page=&limit=` - List visible notes
/// - `GET /notes/:id` - Fetch a note
/// - `PUT /notes/:id` - Update title and/or content
/// - `DELETE /notes/:id` - Soft-delete a note

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, Caller},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use notevault_shared::{
    error::ServiceError,
    filter::Pagination,
    models::note::{Note, UpdateNote},
    services::NewNote,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create note request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteRequest {
    /// Title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Body text
    #[serde(default)]
    pub content: String,
}

/// Update note request
///
/// Unknown fields such as `userId` are ignored; ownership cannot change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNoteRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New body text
    pub content: Option<String>,
}

/// Listing query
///
/// Values stay raw strings so malformed numbers fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListNotesQuery {
    /// Case-insensitive substring over title or content
    pub search: Option<String>,

    /// One-based page number
    pub page: Option<String>,

    /// Page size
    pub limit: Option<String>,
}

/// A path segment that is not a UUID cannot name any note
fn parse_note_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::NotFound.into())
}

/// Create a note owned by the caller
///
/// Returns `201 Created` with the note.
pub async fn create_note(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiJson(req): ApiJson<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    req.validate()?;

    let note = state
        .notes
        .create(
            &caller,
            NewNote {
                title: req.title,
                content: req.content,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// List visible notes
pub async fn list_notes(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(query): Query<ListNotesQuery>,
) -> ApiResult<Json<Vec<Note>>> {
    let page = Pagination::from_query(query.page.as_deref(), query.limit.as_deref());
    let notes = state
        .notes
        .list(&caller, query.search.as_deref(), page)
        .await?;

    Ok(Json(notes))
}

/// Fetch one note
pub async fn get_note(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Note>> {
    let id = parse_note_id(&id)?;
    let note = state.notes.get(&caller, id).await?;

    Ok(Json(note))
}

/// Update title and/or content
pub async fn update_note(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateNoteRequest>,
) -> ApiResult<Json<Note>> {
    req.validate()?;
    let id = parse_note_id(&id)?;

    let note = state
        .notes
        .update(
            &caller,
            id,
            UpdateNote {
                title: req.title,
                content: req.content,
            },
        )
        .await?;

    Ok(Json(note))
}

/// Soft-delete a note
///
/// Returns `204 No Content`, also for a note that was already deleted.
pub async fn delete_note(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_note_id(&id)?;
    state.notes.delete(&caller, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_parse_note_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_note_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_note_id("not-a-uuid"),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_create_note_request_validation() {
        let req: CreateNoteRequest = serde_json::from_str(r#"{"title":"Groceries"}"#).unwrap();
        assert_eq!(req.content, "");
        assert!(req.validate().is_ok());

        let req = CreateNoteRequest {
            title: String::new(),
            content: String::new(),
        };
        assert!(req.validate().is_err());

        let req = CreateNoteRequest {
            title: "x".repeat(256),
            content: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_note_request_ignores_owner_field() {
        let req: UpdateNoteRequest =
            serde_json::from_str(r#"{"content":"new","userId":"someone-else"}"#).unwrap();
        assert!(req.title.is_none());
        assert_eq!(req.content.as_deref(), Some("new"));
        assert!(req.validate().is_ok());
    }
}
