//! Film catalog handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{extract::ApiPath, AppState};
use sakila_common::{
    db::models::{FilmActor, FilmDetail, FilmRentalCount},
    errors::Result,
};

/// Film with its cast. `film` is null for unknown ids.
#[derive(Debug, Serialize)]
pub struct FilmResponse {
    pub film: Option<FilmDetail>,
    pub actors: Vec<FilmActor>,
}

/// Five most rented films
pub async fn top_films(State(state): State<AppState>) -> Result<Json<Vec<FilmRentalCount>>> {
    let films = state.repo().top_films().await?;
    Ok(Json(films))
}

/// Film detail and cast
pub async fn get_film(
    State(state): State<AppState>,
    ApiPath(film_id): ApiPath<u16>,
) -> Result<Json<FilmResponse>> {
    let (film, actors) = state.repo().film_detail(film_id).await?;

    if film.is_none() {
        tracing::debug!(film_id, "Film not found");
    }

    Ok(Json(FilmResponse { film, actors }))
}
