//! Customer rows and write models

use chrono::NaiveDateTime;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

/// Row returned by the paginated customer listing
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_id: u16,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub active: bool,
}

/// Customer joined through address, city and country
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct CustomerDetail {
    pub customer_id: u16,
    pub store_id: u8,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub active: bool,
    pub create_date: NaiveDateTime,
    pub address_id: u16,
    pub address: String,
    pub address2: Option<String>,
    pub district: String,
    pub postal_code: Option<String>,
    pub phone: String,
    pub city_id: u16,
    pub city: String,
    pub country_id: u16,
    pub country: String,
}

/// How an address names its city
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CityRef {
    /// An existing city row
    Id(u16),
    /// Looked up by name within a country, created when missing
    Named { city: String, country_id: u16 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressRecord {
    pub address: String,
    pub address2: Option<String>,
    pub district: String,
    pub postal_code: Option<String>,
    pub phone: String,
    pub city: CityRef,
}

/// Column values written by customer create and update
///
/// `store_id` and `active` are optional: create falls back to store 1 and
/// an active customer, update keeps the stored values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerRecord {
    pub store_id: Option<u8>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub active: Option<bool>,
    pub address: AddressRecord,
}

/// Keys of a freshly created customer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCustomer {
    pub customer_id: u64,
    pub address_id: u64,
}
