//! Customer handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::MessageResponse;
use crate::{
    extract::{ApiJson, ApiPath, ApiQuery},
    AppState,
};
use sakila_common::{
    db::models::{
        AddressRecord, CityRef, CreatedCustomer, CustomerDetail, CustomerRecord, CustomerSummary,
    },
    errors::{AppError, Result},
    metrics,
};

/// Paging and search parameters for the customer listing
#[derive(Debug, Deserialize, Validate)]
pub struct ListParams {
    pub q: Option<String>,

    /// 1-based page number
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u64,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,
}

fn default_page() -> u64 { 1 }
fn default_limit() -> u64 { 20 }

#[derive(Debug, Serialize)]
pub struct CustomerPage {
    pub data: Vec<CustomerSummary>,
    pub page: u64,
    pub limit: u64,
}

/// Body for customer create and update
///
/// The city is given either as `city_id` or as `city` plus `country_id`.
/// Omitted `store_id`/`active` default to store 1 and active on create and
/// are left untouched on update.
#[derive(Debug, Deserialize, Validate)]
pub struct CustomerPayload {
    #[validate(range(min = 1))]
    pub store_id: Option<u8>,

    #[validate(length(min = 1, max = 45))]
    pub first_name: String,

    #[validate(length(min = 1, max = 45))]
    pub last_name: String,

    #[validate(email, length(max = 50))]
    pub email: Option<String>,

    pub active: Option<bool>,

    #[validate(length(min = 1, max = 50))]
    pub address: String,

    #[validate(length(max = 50))]
    pub address2: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub district: String,

    #[validate(length(max = 10))]
    pub postal_code: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub phone: String,

    pub city_id: Option<u16>,

    /// Only read when `city_id` is absent
    pub city: Option<String>,

    pub country_id: Option<u16>,
}

/// `city.city` column width
const CITY_MAX_LEN: usize = 50;

impl CustomerPayload {
    /// Validate and convert into the column values the repository writes
    pub fn into_record(self) -> Result<CustomerRecord> {
        self.validate()?;

        let city = match (self.city_id, self.city, self.country_id) {
            (Some(city_id), _, _) => CityRef::Id(city_id),
            (None, Some(city), Some(country_id)) => {
                let city = city.trim();
                if city.is_empty() || city.chars().count() > CITY_MAX_LEN {
                    return Err(AppError::Validation {
                        message: format!("city must be 1 to {} characters", CITY_MAX_LEN),
                        field: Some("city".to_string()),
                    });
                }
                CityRef::Named {
                    city: city.to_string(),
                    country_id,
                }
            }
            (None, Some(_), None) => {
                return Err(AppError::MissingField {
                    field: "country_id".to_string(),
                })
            }
            (None, None, _) => {
                return Err(AppError::MissingField {
                    field: "city_id".to_string(),
                })
            }
        };

        Ok(CustomerRecord {
            store_id: self.store_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            active: self.active,
            address: AddressRecord {
                address: self.address,
                address2: self.address2,
                district: self.district,
                postal_code: self.postal_code,
                phone: self.phone,
                city,
            },
        })
    }
}

/// List or search customers, one page at a time
pub async fn list_customers(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<CustomerPage>> {
    params.validate()?;

    let data = state
        .repo()
        .list_customers(params.q.as_deref(), params.page, params.limit)
        .await?;

    Ok(Json(CustomerPage {
        data,
        page: params.page,
        limit: params.limit,
    }))
}

/// Customer with address, city and country
pub async fn get_customer(
    State(state): State<AppState>,
    ApiPath(customer_id): ApiPath<u16>,
) -> Result<Json<CustomerDetail>> {
    state
        .repo()
        .find_customer(customer_id)
        .await?
        .map(Json)
        .ok_or(AppError::CustomerNotFound { id: customer_id })
}

pub async fn create_customer(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CustomerPayload>,
) -> Result<(StatusCode, Json<CreatedCustomer>)> {
    let record = payload.into_record()?;
    let created = state.repo().create_customer(&record).await?;

    metrics::record_customer_mutation("create");
    tracing::info!(
        customer_id = created.customer_id,
        address_id = created.address_id,
        "Customer created"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_customer(
    State(state): State<AppState>,
    ApiPath(customer_id): ApiPath<u16>,
    ApiJson(payload): ApiJson<CustomerPayload>,
) -> Result<Json<MessageResponse>> {
    let record = payload.into_record()?;
    state.repo().update_customer(customer_id, &record).await?;

    metrics::record_customer_mutation("update");
    tracing::info!(customer_id, "Customer updated");

    Ok(Json(MessageResponse::new("Customer updated")))
}

/// Delete a customer together with their payments and rentals
pub async fn delete_customer(
    State(state): State<AppState>,
    ApiPath(customer_id): ApiPath<u16>,
) -> Result<Json<MessageResponse>> {
    state.repo().delete_customer(customer_id).await?;

    metrics::record_customer_mutation("delete");
    tracing::info!(customer_id, "Customer deleted");

    Ok(Json(MessageResponse::new("Customer deleted")))
}
