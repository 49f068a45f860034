//! Film rows produced by the catalog queries

use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

/// A film with its total rental count
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct FilmRentalCount {
    pub film_id: u16,
    pub title: String,
    pub rentals: i64,
}

/// Film detail joined to its language and (first) category
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct FilmDetail {
    pub film_id: u16,
    pub title: String,
    pub description: Option<String>,
    /// Running time in minutes
    pub length: Option<u16>,
    pub rating: Option<String>,
    pub language: String,
    pub category: Option<String>,
}

/// Minimal film row returned by free-text search
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct FilmSummary {
    pub film_id: u16,
    pub title: String,
}

/// Actor credited on a film, with the display name
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct FilmActor {
    pub actor_id: u16,
    pub name: String,
}
