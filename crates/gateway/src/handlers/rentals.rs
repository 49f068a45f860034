//! Rental handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    extract::{ApiJson, ApiPath},
    AppState,
};
use sakila_common::{
    db::models::{CreatedRental, RentalHistory},
    errors::{AppError, Result},
    metrics,
};

#[derive(Debug, Deserialize, Validate)]
pub struct RentRequest {
    #[validate(range(min = 1))]
    pub film_id: u16,

    #[validate(range(min = 1))]
    pub customer_id: u16,
}

#[derive(Debug, Serialize)]
pub struct ReturnResponse {
    pub message: String,
    pub rental_id: i32,
}

/// Rent any free copy of a film
pub async fn rent_film(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RentRequest>,
) -> Result<(StatusCode, Json<CreatedRental>)> {
    request.validate()?;

    let rental = match state
        .repo()
        .rent_film(request.film_id, request.customer_id)
        .await
    {
        Ok(rental) => rental,
        Err(err @ AppError::NoCopyAvailable { .. }) => {
            metrics::record_rent_conflict();
            return Err(err);
        }
        Err(err) => return Err(err),
    };

    metrics::record_rental_opened();
    tracing::info!(
        rental_id = rental.rental_id,
        inventory_id = rental.inventory_id,
        film_id = request.film_id,
        customer_id = request.customer_id,
        "Rental opened"
    );

    Ok((StatusCode::CREATED, Json(rental)))
}

/// Mark an open rental returned
pub async fn return_rental(
    State(state): State<AppState>,
    ApiPath(rental_id): ApiPath<i32>,
) -> Result<Json<ReturnResponse>> {
    state.repo().return_rental(rental_id).await?;

    metrics::record_rental_returned();
    tracing::info!(rental_id, "Rental returned");

    Ok(Json(ReturnResponse {
        message: "Rental returned".to_string(),
        rental_id,
    }))
}

/// A customer's rentals split into open and returned, newest first
pub async fn customer_rentals(
    State(state): State<AppState>,
    ApiPath(customer_id): ApiPath<u16>,
) -> Result<Json<RentalHistory>> {
    Ok(Json(state.repo().customer_rentals(customer_id).await?))
}
