//! Experience point handlers

use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::types::{required, AddXpRequest, UsernameQuery, XpAwardResponse, XpResponse};
use crate::api::AppState;
use crate::error::{Error, Result};
use crate::types::ExpLogEntry;

pub async fn get_xp(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UsernameQuery>,
) -> Result<Json<XpResponse>> {
    let username = required(query.username, "username")?;
    let (user, auto_created) = state.db().get_or_create_xp(&username)?;
    if auto_created {
        info!("Created account for {}", username);
    }
    Ok(Json(XpResponse { user, auto_created }))
}

pub async fn add_xp(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AddXpRequest>,
) -> Result<Json<XpAwardResponse>> {
    let username = required(req.username, "username")?;
    let amount = req.amount.ok_or_else(|| Error::missing("amount"))?;

    let totals = state.db().add_xp(&username, amount)?;
    info!(
        "Awarded {} XP to {} (level {}, {} xp)",
        amount, username, totals.level, totals.xp
    );
    Ok(Json(XpAwardResponse { username, totals }))
}

pub async fn history(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UsernameQuery>,
) -> Result<Json<Vec<ExpLogEntry>>> {
    let username = required(query.username, "username")?;
    let entries = state.db().get_exp_history(&username)?;
    Ok(Json(entries))
}
