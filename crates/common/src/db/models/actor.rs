//! Actor rows

use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct Actor {
    pub actor_id: u16,
    pub first_name: String,
    pub last_name: String,
}

/// An actor with the rental count summed over all their films
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct ActorRentalCount {
    pub actor_id: u16,
    pub name: String,
    pub rentals: i64,
}
