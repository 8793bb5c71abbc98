//! Progress handlers

use axum::extract::State;
use axum::Json;
use tracing::debug;

use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::types::{required, SetProgressRequest, UsernameQuery};
use crate::api::AppState;
use crate::error::{Error, Result};
use crate::types::{Progress, ProgressMap};

pub async fn get_progress(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UsernameQuery>,
) -> Result<Json<Vec<Progress>>> {
    let username = required(query.username, "username")?;
    let progress = state.db().get_progress(&username)?;
    Ok(Json(progress))
}

pub async fn get_progress_map(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UsernameQuery>,
) -> Result<Json<ProgressMap>> {
    let username = required(query.username, "username")?;
    let progress = state.db().get_progress_map(&username)?;
    Ok(Json(progress))
}

pub async fn set_progress(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SetProgressRequest>,
) -> Result<Json<Progress>> {
    let username = required(req.username, "username")?;
    let subject = required(req.subject, "subject")?;
    let value = req.value.ok_or_else(|| Error::missing("value"))?;

    let progress = state.db().set_progress(&username, &subject, value)?;
    debug!("Progress for {} in {} is now {}", username, subject, value);
    Ok(Json(progress))
}
