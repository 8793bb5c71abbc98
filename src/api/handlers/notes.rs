//! Notes and comments handlers

use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::types::{
    required, AddCommentRequest, CreateNoteRequest, SubjectQuery, SuccessResponse,
};
use crate::api::AppState;
use crate::error::Result;
use crate::types::{Comment, NewComment, NewNote, Note};

pub async fn list_notes(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SubjectQuery>,
) -> Result<Json<Vec<Note>>> {
    let subject = required(query.subject, "subject")?;
    let notes = state.db().list_notes(&subject)?;
    Ok(Json(notes))
}

pub async fn create_note(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateNoteRequest>,
) -> Result<Json<Note>> {
    let note = NewNote {
        subject: required(req.subject, "subject")?,
        author: required(req.author, "author")?,
        content: required(req.content, "content")?,
        is_public: req.is_public.unwrap_or(false),
    };

    let note = state.db().create_note(&note)?;
    info!("Created note {} in {}", note.id, note.subject);
    Ok(Json(note))
}

pub async fn delete_note(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<SuccessResponse>> {
    state.db().delete_note(id)?;
    info!("Deleted note {} and its comments", id);
    Ok(Json(SuccessResponse::ok()))
}

pub async fn list_comments(
    State(state): State<AppState>,
    ApiPath(note_id): ApiPath<i64>,
) -> Result<Json<Vec<Comment>>> {
    let comments = state.db().get_comments(note_id)?;
    Ok(Json(comments))
}

pub async fn add_comment(
    State(state): State<AppState>,
    ApiPath(note_id): ApiPath<i64>,
    ApiJson(req): ApiJson<AddCommentRequest>,
) -> Result<Json<Comment>> {
    let comment = NewComment {
        note_id,
        author: required(req.author, "author")?,
        content: required(req.content, "content")?,
    };

    let comment = state.db().add_comment(&comment)?;
    info!("Added comment {} to note {}", comment.id, note_id);
    Ok(Json(comment))
}
