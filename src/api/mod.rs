//! JSON REST API
//!
//! Exposes the store over HTTP:
//! - /notes, /notes/{id}/comments: notes with threaded comments
//! - /files, /upload, /uploads/*: subject files and their stored objects
//! - /questions, /answers, /grades: question/answer/grading workflow
//! - /reflections: journal entries with soft delete and restore
//! - /progress: per-subject progress values
//! - /xp: experience points, levels and the XP ledger
//! - /lessons: static lesson catalog

pub mod error;
pub mod extract;
pub mod handlers;
pub mod types;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tokio_util::task::TaskTracker;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::db::Database;
use crate::storage::UploadStore;
use crate::types::LessonCatalog;

/// Largest accepted multipart upload
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
    uploads: UploadStore,
    lessons: Arc<LessonCatalog>,
    tasks: TaskTracker,
}

impl AppState {
    pub fn new(db: Database, uploads: UploadStore, lessons: LessonCatalog) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            uploads,
            lessons: Arc::new(lessons),
            tasks: TaskTracker::new(),
        }
    }

    /// Lock the database for one unit of work; never hold across `.await`.
    ///
    /// A panic in another request leaves the connection usable: any open
    /// transaction was rolled back when it unwound, so the lock is recovered.
    pub fn db(&self) -> MutexGuard<'_, Database> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }

    pub fn lessons(&self) -> &LessonCatalog {
        &self.lessons
    }

    /// Tracker for best-effort background work such as file removal
    pub fn tasks(&self) -> &TaskTracker {
        &self.tasks
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let uploads_dir = state.uploads().dir().to_path_buf();

    Router::new()
        .route(
            "/notes",
            get(handlers::notes::list_notes).post(handlers::notes::create_note),
        )
        .route("/notes/{id}", delete(handlers::notes::delete_note))
        .route(
            "/notes/{id}/comments",
            get(handlers::notes::list_comments).post(handlers::notes::add_comment),
        )
        .route("/files", get(handlers::files::list_files))
        .route("/files/{id}", delete(handlers::files::delete_file))
        .route(
            "/upload",
            post(handlers::files::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/xp", get(handlers::xp::get_xp))
        .route("/xp/add", post(handlers::xp::add_xp))
        .route("/xp/history", get(handlers::xp::history))
        .route(
            "/reflections",
            get(handlers::reflections::list_reflections)
                .post(handlers::reflections::create_reflection),
        )
        .route("/reflections/deleted", get(handlers::reflections::list_deleted))
        .route("/reflections/delete", post(handlers::reflections::soft_delete))
        .route("/reflections/restore", post(handlers::reflections::restore))
        .route(
            "/questions",
            get(handlers::questions::list_questions).post(handlers::questions::create_question),
        )
        .route("/questions/{id}", delete(handlers::questions::delete_question))
        .route(
            "/answers",
            get(handlers::questions::list_answers).post(handlers::questions::create_answer),
        )
        .route(
            "/grades",
            get(handlers::questions::list_grades).post(handlers::questions::grade_answer),
        )
        .route(
            "/progress",
            get(handlers::progress::get_progress).post(handlers::progress::set_progress),
        )
        .route("/progress/map", get(handlers::progress::get_progress_map))
        .route("/lessons", get(handlers::lessons::list_lessons))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
