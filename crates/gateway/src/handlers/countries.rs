//! Country lookup

use axum::{extract::State, Json};

use crate::AppState;
use sakila_common::{db::models::Country, errors::Result};

/// All countries ordered by name
pub async fn list_countries(State(state): State<AppState>) -> Result<Json<Vec<Country>>> {
    Ok(Json(state.repo().list_countries().await?))
}
