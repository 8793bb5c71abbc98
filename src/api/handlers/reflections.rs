//! Reflection (journal) handlers
//!
//! Creating a reflection awards `REFLECTION_XP`. The award runs after the
//! reflection is committed and its failure does not undo the reflection; it
//! is reported in the response as `xpError` instead.

use axum::extract::State;
use axum::Json;
use tracing::{info, warn};

use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::types::{
    optional, required, required_id, CreateReflectionRequest, ReflectionCreatedResponse,
    ReflectionIdRequest, SuccessResponse, UsernameQuery, XpAwardResponse,
};
use crate::api::AppState;
use crate::error::Result;
use crate::types::{NewReflection, Reflection, ReflectionFilter};
use crate::xp::REFLECTION_XP;

pub async fn create_reflection(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateReflectionRequest>,
) -> Result<Json<ReflectionCreatedResponse>> {
    let reflection = NewReflection {
        username: required(req.username, "username")?,
        subject: required(req.subject, "subject")?,
        content: required(req.content, "content")?,
        mood: optional(req.mood),
    };

    let mut db = state.db();
    let reflection = db.create_reflection(&reflection)?;
    info!(
        "Created reflection {} for {}",
        reflection.id, reflection.username
    );

    let (xp, xp_error) = match db.add_xp(&reflection.username, REFLECTION_XP) {
        Ok(totals) => (
            Some(XpAwardResponse {
                username: reflection.username.clone(),
                totals,
            }),
            None,
        ),
        Err(err) => {
            warn!(
                "Reflection {} kept but XP award for {} failed: {}",
                reflection.id, reflection.username, err
            );
            (None, Some(err.to_string()))
        }
    };

    Ok(Json(ReflectionCreatedResponse {
        reflection,
        xp,
        xp_error,
    }))
}

pub async fn list_reflections(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UsernameQuery>,
) -> Result<Json<Vec<Reflection>>> {
    let username = required(query.username, "username")?;
    let reflections = state.db().list_reflections(&username, ReflectionFilter::Active)?;
    Ok(Json(reflections))
}

/// Soft-deleted reflections, for undo
pub async fn list_deleted(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UsernameQuery>,
) -> Result<Json<Vec<Reflection>>> {
    let username = required(query.username, "username")?;
    let reflections = state.db().list_reflections(&username, ReflectionFilter::Deleted)?;
    Ok(Json(reflections))
}

pub async fn soft_delete(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ReflectionIdRequest>,
) -> Result<Json<SuccessResponse>> {
    let id = required_id(req.id, "id")?;
    state.db().soft_delete_reflection(id)?;
    info!("Soft-deleted reflection {}", id);
    Ok(Json(SuccessResponse::ok()))
}

pub async fn restore(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ReflectionIdRequest>,
) -> Result<Json<SuccessResponse>> {
    let id = required_id(req.id, "id")?;
    state.db().restore_reflection(id)?;
    info!("Restored reflection {}", id);
    Ok(Json(SuccessResponse::ok()))
}
