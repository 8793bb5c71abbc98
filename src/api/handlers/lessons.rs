//! Lesson catalog handler

use axum::extract::State;
use axum::Json;

use crate::api::AppState;
use crate::types::LessonCatalog;

pub async fn list_lessons(State(state): State<AppState>) -> Json<LessonCatalog> {
    Json(state.lessons().clone())
}
