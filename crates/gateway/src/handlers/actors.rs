//! Actor handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{extract::ApiPath, AppState};
use sakila_common::{
    db::models::{Actor, ActorRentalCount, FilmRentalCount},
    errors::Result,
};

#[derive(Debug, Serialize)]
pub struct ActorFilmsResponse {
    pub actor: Option<Actor>,
    pub films: Vec<FilmRentalCount>,
}

pub async fn top_actors(State(state): State<AppState>) -> Result<Json<Vec<ActorRentalCount>>> {
    let actors = state.repo().top_actors().await?;
    Ok(Json(actors))
}

/// An actor's five most rented films
pub async fn actor_top_films(
    State(state): State<AppState>,
    ApiPath(actor_id): ApiPath<u16>,
) -> Result<Json<ActorFilmsResponse>> {
    let (actor, films) = state.repo().actor_top_films(actor_id).await?;
    Ok(Json(ActorFilmsResponse { actor, films }))
}
