//! Free-text film search

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{extract::ApiQuery, AppState};
use sakila_common::{db::models::FilmSummary, errors::Result};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Matched against title, actor name and category. Blank matches all.
    #[serde(default)]
    pub q: String,
}

pub async fn search_films(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<FilmSummary>>> {
    let films = state.repo().search_films(&params.q).await?;

    tracing::debug!(query = %params.q, results = films.len(), "Film search");

    Ok(Json(films))
}
