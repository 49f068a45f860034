//! Rental rows and lifecycle helpers

use chrono::NaiveDateTime;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

/// Rental lifecycle state. `Returned` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    Open,
    Returned,
}

/// A customer's rental joined to the film title
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct CustomerRental {
    pub rental_id: i32,
    pub rental_date: NaiveDateTime,
    pub return_date: Option<NaiveDateTime>,
    pub inventory_id: u32,
    pub film_id: u16,
    pub title: String,
}

impl CustomerRental {
    pub fn status(&self) -> RentalStatus {
        match self.return_date {
            None => RentalStatus::Open,
            Some(_) => RentalStatus::Returned,
        }
    }

    /// The copy is still out
    pub fn is_open(&self) -> bool {
        self.status() == RentalStatus::Open
    }
}

/// Rental history split by lifecycle state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalHistory {
    pub open: Vec<CustomerRental>,
    pub returned: Vec<CustomerRental>,
}

impl RentalHistory {
    /// Partition rows, keeping their relative order within each side
    pub fn from_rows(rows: Vec<CustomerRental>) -> Self {
        let (open, returned) = rows.into_iter().partition(CustomerRental::is_open);
        Self { open, returned }
    }
}

/// Keys of a newly opened rental
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRental {
    pub rental_id: u64,
    pub inventory_id: u32,
}
